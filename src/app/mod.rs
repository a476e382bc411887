use std::sync::Mutex;

use tauri::image::Image;
use tauri::Manager;

use crate::binaries;
use crate::config::{LazyOcrConfig, OcrConfig};
use crate::ocr::{OcrJob, Session};

mod invoke;

/// Icône de fenêtre livrée dans les ressources.
const WINDOW_ICON_RESOURCE: &str = "icons/ocr-pdf.png";

/// Charge l'icône de la fenêtre, avec repli sur l'icône par défaut du bundle.
fn load_window_icon(app: &tauri::App) -> Option<Image<'static>> {
    let custom = app
        .path()
        .resource_dir()
        .ok()
        .map(|dir| dir.join(WINDOW_ICON_RESOURCE))
        .and_then(|path| Image::from_path(path).ok());

    custom.or_else(|| {
        log::info!("[app] custom icon unavailable, using bundled default");
        app.default_window_icon().cloned().map(|icon| icon.to_owned())
    })
}

/// Construit et lance l'application Tauri avec plugins, setup et commandes IPC.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = tauri::Builder::default().plugin(tauri_plugin_dialog::init());
    let builder = invoke::register_invoke_handler(builder);

    builder
        .setup(|app| {
            // Activation du logging Tauri en debug pour faciliter le diagnostic local.
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            if let Ok(resource_dir) = app.path().resource_dir() {
                binaries::init_resource_dir(resource_dir);
            }

            app.manage(LazyOcrConfig::new(OcrConfig::default()));
            let warmup_handle = app.handle().clone();
            tauri::async_runtime::spawn_blocking(move || {
                warmup_handle.state::<LazyOcrConfig>().get();
            });
            app.manage(Mutex::new(Session::new()));
            app.manage(OcrJob::new());

            if let (Some(window), Some(icon)) =
                (app.get_webview_window("main"), load_window_icon(app))
            {
                window.set_icon(icon)?;
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
