use std::time::Duration;

use serde::Serialize;

/// Gravité d'un message transitoire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

impl MessageKind {
    /// Nom d'icône freedesktop associé.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Warning => "dialog-warning",
            Self::Error => "dialog-error",
        }
    }
}

/// Message de statut affiché en bas de fenêtre puis masqué après `timeout_ms`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub icon: &'static str,
    pub text: String,
    pub timeout_ms: u64,
}

impl StatusMessage {
    fn new(kind: MessageKind, text: &str, timeout: Duration) -> Self {
        Self {
            kind,
            icon: kind.icon_name(),
            text: text.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Délai avant masquage.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// OCR terminé avec succès.
    pub fn ocr_done() -> Self {
        Self::new(MessageKind::Info, "OCR Done.", Duration::from_secs(5))
    }

    /// L'outil OCR s'est terminé en erreur; délai plus long pour laisser le temps de lire.
    pub fn ocr_failed() -> Self {
        Self::new(MessageKind::Error, "OCR Error.", Duration::from_secs(10))
    }

    /// L'outil OCR n'a pas pu être lancé.
    pub fn ocr_unavailable() -> Self {
        Self::new(
            MessageKind::Error,
            "Unable to start the OCR tool.",
            Duration::from_secs(10),
        )
    }

    pub fn not_a_pdf() -> Self {
        Self::new(
            MessageKind::Warning,
            "The file is not a PDF",
            Duration::from_secs(3),
        )
    }

    pub fn ocr_cancelled() -> Self {
        Self::new(MessageKind::Warning, "OCR cancelled.", Duration::from_secs(3))
    }

    pub fn ocr_busy() -> Self {
        Self::new(
            MessageKind::Warning,
            "An OCR job is already running.",
            Duration::from_secs(3),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_stay_longer_than_success() {
        assert_eq!(StatusMessage::ocr_done().timeout(), Duration::from_secs(5));
        assert_eq!(StatusMessage::ocr_failed().timeout(), Duration::from_secs(10));
        assert_eq!(StatusMessage::not_a_pdf().timeout(), Duration::from_secs(3));
    }

    #[test]
    fn serializes_for_the_frontend() {
        let value = serde_json::to_value(StatusMessage::ocr_failed()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "error",
                "icon": "dialog-error",
                "text": "OCR Error.",
                "timeoutMs": 10000,
            })
        );
    }
}
