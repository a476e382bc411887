
use crate::config::OcrConfig;
use crate::utils::path::has_pdf_extension;
use crate::utils::process::CommandRunner;

/// Marqueur recherché dans la sortie de la sonde de type.
const PDF_MARKER: &str = "PDF";

/// Verdict du classifieur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Pdf,
    NotPdf,
}

impl Classification {
    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Classe un chemin déjà normalisé.
///
/// La sonde de contenu fait foi quand elle répond; l'extension `.pdf` sert de
/// repli quand l'outil est absent ou ne reconnaît pas le fichier.
pub fn classify_pdf(path: &str, runner: &dyn CommandRunner, config: &OcrConfig) -> Classification {
    let probe = runner.run(&config.probe_command(path));
    let description = probe.stdout_text().unwrap_or_default();

    if probe.ok && !description.is_empty() && description.contains(PDF_MARKER) {
        log::debug!("[ocr] probe says PDF for {}: {}", path, description.trim());
        return Classification::Pdf;
    }

    if has_pdf_extension(path) {
        log::debug!("[ocr] {} classified as PDF by extension", path);
        return Classification::Pdf;
    }

    Classification::NotPdf
}
