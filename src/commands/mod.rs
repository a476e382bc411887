/// Commandes de diagnostic des outils externes.
pub mod diagnostics;
/// Commandes d'ouverture de fichier et de pilotage de l'OCR.
pub mod files;
