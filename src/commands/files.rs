use std::sync::Mutex;

use tauri::{Emitter, Manager};
use tauri_plugin_dialog::DialogExt;

use crate::config::LazyOcrConfig;
use crate::ocr::{self, OcrJob, Session, StatusMessage};
use crate::utils::process::ShellRunner;

/// Événement portant un [`StatusMessage`] à afficher.
pub const STATUS_MESSAGE_EVENT: &str = "status-message";
/// Événement booléen signalant qu'un OCR tourne.
pub const OCR_RUNNING_EVENT: &str = "ocr-running";

/// Émet un message de statut vers le frontend.
fn emit_status(app_handle: &tauri::AppHandle, message: &StatusMessage) {
    let _ = app_handle.emit(STATUS_MESSAGE_EVENT, message);
}

/// Traite une URI déposée ou un chemin choisi jusqu'au message final.
///
/// La classification tourne sur un thread bloquant et l'OCR dans une tâche
/// annulable, jamais sur le thread de l'interface.
pub async fn process_open_request(
    app_handle: tauri::AppHandle,
    raw: String,
) -> Result<StatusMessage, String> {
    let probe_handle = app_handle.clone();
    let (config, inspection) = tauri::async_runtime::spawn_blocking(move || {
        let config = probe_handle.state::<LazyOcrConfig>().get().clone();
        let inspection = ocr::inspect(&raw, &ShellRunner, &config);
        (config, inspection)
    })
    .await
    .map_err(|e| format!("Failed to classify file: {}", e))?;

    if !inspection.classification.is_pdf() {
        let message = StatusMessage::not_a_pdf();
        emit_status(&app_handle, &message);
        return Ok(message);
    }

    let job = app_handle.state::<OcrJob>();
    let Some(guard) = job.begin() else {
        let message = StatusMessage::ocr_busy();
        emit_status(&app_handle, &message);
        return Ok(message);
    };

    ocr::record_selection(&app_handle.state::<Mutex<Session>>(), inspection.path.clone());

    log::info!("[ocr] starting OCR on {}", inspection.path);
    let _ = app_handle.emit(OCR_RUNNING_EVENT, true);
    let message = guard.run(&config.ocr_command(&inspection.path)).await;
    let _ = app_handle.emit(OCR_RUNNING_EVENT, false);
    log::info!("[ocr] {} -> {}", inspection.path, message.text);

    emit_status(&app_handle, &message);
    Ok(message)
}

/// Commande IPC: ouvre l'URI déposée sur la fenêtre (`text/uri-list` ou texte brut).
#[tauri::command]
pub async fn open_file(app_handle: tauri::AppHandle, uri: String) -> Result<StatusMessage, String> {
    process_open_request(app_handle, uri).await
}

/// Affiche le sélecteur de fichier puis traite le fichier choisi; `None` si annulé.
#[tauri::command]
pub async fn pick_pdf_file(app_handle: tauri::AppHandle) -> Result<Option<StatusMessage>, String> {
    let dialog_handle = app_handle.clone();
    let picked = tauri::async_runtime::spawn_blocking(move || {
        dialog_handle
            .dialog()
            .file()
            .set_title("Open PDF Document")
            .blocking_pick_file()
    })
    .await
    .map_err(|e| format!("File dialog failed: {}", e))?;

    let Some(file_path) = picked else {
        return Ok(None);
    };
    let path = file_path
        .into_path()
        .map_err(|e| format!("Unsupported file location: {}", e))?;

    process_open_request(app_handle, path.to_string_lossy().to_string())
        .await
        .map(Some)
}

/// Annule l'OCR en cours; `false` si aucun ne tournait.
#[tauri::command]
pub fn cancel_ocr(job: tauri::State<'_, OcrJob>) -> bool {
    job.cancel()
}

/// Retourne le dernier PDF sélectionné.
#[tauri::command]
pub fn get_selected_pdf(session: tauri::State<'_, Mutex<Session>>) -> Option<String> {
    ocr::current_selection(&session)
}
