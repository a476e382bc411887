use crate::commands;

/// Enregistre la liste unique des commandes IPC exposées au frontend.
pub fn register_invoke_handler(builder: tauri::Builder<tauri::Wry>) -> tauri::Builder<tauri::Wry> {
    builder.invoke_handler(tauri::generate_handler![
        commands::files::open_file,
        commands::files::pick_pdf_file,
        commands::files::cancel_ocr,
        commands::files::get_selected_pdf,
        commands::diagnostics::diagnose_ocr_binaries
    ])
}
