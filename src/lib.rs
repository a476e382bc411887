//! Entrypoint de la bibliothèque ocr-pdf.
//!
//! Le cœur (normalisation, classification, exécution de commandes) ne dépend
//! pas de Tauri; la fenêtre et les commandes IPC sont derrière la feature
//! `desktop`, active par défaut.

#[cfg(feature = "desktop")]
mod app;
pub mod binaries;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod ocr;
pub mod utils;

/// Lance l'application Tauri.
#[cfg(feature = "desktop")]
pub fn run() {
    app::run();
}
