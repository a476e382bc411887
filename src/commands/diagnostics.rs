use std::process::Command;

use crate::binaries;
use crate::config::{DEFAULT_OCR_PROGRAM, DEFAULT_PROBE_PROGRAM};
use crate::utils::process::configure_command_no_window;

/// Résultat de diagnostic d'un outil externe.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryDiagnosticResult {
    #[serde(flatten)]
    pub resolution: binaries::BinaryResolveDebugInfo,
    /// Première ligne de version si exécutable.
    pub version_output: Option<String>,
}

/// Extrait la première ligne de sortie de version d'un binaire.
fn get_binary_version_line(binary_path: &str) -> Option<String> {
    let mut cmd = Command::new(binary_path);
    cmd.arg("--version");
    configure_command_no_window(&mut cmd);
    let output = cmd.output().ok()?;
    let stream = if output.status.success() {
        &output.stdout
    } else {
        &output.stderr
    };
    let line = binaries::first_non_empty_line(&String::from_utf8_lossy(stream));
    (!line.is_empty()).then_some(line)
}

/// Commande IPC de diagnostic de résolution de la sonde de type et de l'outil OCR.
#[tauri::command]
pub fn diagnose_ocr_binaries() -> Vec<BinaryDiagnosticResult> {
    [DEFAULT_PROBE_PROGRAM, DEFAULT_OCR_PROGRAM]
        .iter()
        .map(|name| {
            let resolution = binaries::resolve_binary_debug(name);
            let version_output = resolution
                .resolved_path
                .as_deref()
                .and_then(get_binary_version_line);
            BinaryDiagnosticResult {
                resolution,
                version_output,
            }
        })
        .collect()
}
