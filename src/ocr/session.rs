use std::sync::{Mutex, MutexGuard};

/// État d'une session d'ouverture: le PDF actuellement sélectionné.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    selected_pdf: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace le PDF sélectionné.
    pub fn select(&mut self, path: impl Into<String>) {
        self.selected_pdf = Some(path.into());
    }

    pub fn selected_pdf(&self) -> Option<&str> {
        self.selected_pdf.as_deref()
    }
}

/// Verrouille la session partagée, même après un panic d'un autre détenteur.
fn lock_session(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

/// Enregistre la sélection dans la session partagée.
pub fn record_selection(session: &Mutex<Session>, path: impl Into<String>) {
    lock_session(session).select(path);
}

/// Copie du PDF sélectionné dans la session partagée.
pub fn current_selection(session: &Mutex<Session>) -> Option<String> {
    lock_session(session).selected_pdf().map(str::to_string)
}
