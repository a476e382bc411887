//! Enchaînement d'une ouverture de fichier: normalisation, classification, OCR.

mod classify;
mod job;
mod message;
mod session;

pub use classify::{classify_pdf, Classification};
pub use job::{OcrJob, OcrJobGuard};
pub use message::{MessageKind, StatusMessage};
pub use session::{current_selection, record_selection, Session};

use crate::config::OcrConfig;
use crate::utils::path::normalize_uri;
use crate::utils::process::{CommandResult, CommandRunner};

/// Chemin normalisé et verdict du classifieur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
    pub path: String,
    pub classification: Classification,
}

/// Issue complète d'une ouverture de fichier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenFileOutcome {
    pub inspection: Inspection,
    /// Résultat de l'OCR, absent si le fichier n'était pas un PDF.
    pub ocr: Option<CommandResult>,
    pub message: StatusMessage,
}

/// Normalise l'entrée brute puis classe le chemin obtenu.
pub fn inspect(raw: &str, runner: &dyn CommandRunner, config: &OcrConfig) -> Inspection {
    let path = normalize_uri(raw);
    let classification = classify_pdf(&path, runner, config);
    log::info!("[ocr] {} -> {:?}", path, classification);
    Inspection {
        path,
        classification,
    }
}

/// Traduit le résultat de l'outil OCR en message utilisateur.
pub fn ocr_message(result: &CommandResult) -> StatusMessage {
    if result.succeeded() {
        return StatusMessage::ocr_done();
    }
    if !result.ok {
        log::warn!("[ocr] OCR tool could not be started");
        return StatusMessage::ocr_unavailable();
    }
    log::warn!(
        "[ocr] OCR failed with exit={:?}: {}",
        result.exit,
        result.failure_summary().unwrap_or_default()
    );
    StatusMessage::ocr_failed()
}

/// Traite une ouverture de fichier de bout en bout, de manière synchrone.
///
/// Un fichier qui n'est pas un PDF n'invoque jamais l'OCR. Sinon le chemin est
/// retenu dans la session et l'OCR le réécrit en place.
pub fn open_file(
    raw: &str,
    runner: &dyn CommandRunner,
    config: &OcrConfig,
    session: &mut Session,
) -> OpenFileOutcome {
    let inspection = inspect(raw, runner, config);
    if !inspection.classification.is_pdf() {
        return OpenFileOutcome {
            inspection,
            ocr: None,
            message: StatusMessage::not_a_pdf(),
        };
    }

    session.select(inspection.path.clone());
    let result = runner.run(&config.ocr_command(&inspection.path));
    let message = ocr_message(&result);
    OpenFileOutcome {
        inspection,
        ocr: Some(result),
        message,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::utils::process::ExitState;

    use super::*;

    /// Exécuteur factice: répond selon le programme appelé.
    struct ScriptedRunner {
        probe: CommandResult,
        ocr: CommandResult,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(probe_stdout: &str, ocr_exit: Option<i32>) -> Self {
            Self {
                probe: CommandResult {
                    ok: true,
                    stdout: Some(probe_stdout.as_bytes().to_vec()),
                    stderr: Some(Vec::new()),
                    exit: Some(ExitState::Exited(0)),
                },
                ocr: match ocr_exit {
                    Some(code) => CommandResult {
                        ok: true,
                        stdout: Some(Vec::new()),
                        stderr: Some(b"ERROR - page 1: boom\n".to_vec()),
                        exit: Some(ExitState::Exited(code)),
                    },
                    None => CommandResult::failed(),
                },
                calls: RefCell::new(Vec::new()),
            }
        }

        fn ocr_calls(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|call| call.starts_with("ocrmypdf"))
                .count()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command_line: &str) -> CommandResult {
            self.calls.borrow_mut().push(command_line.to_string());
            if command_line.starts_with("ocrmypdf") {
                self.ocr.clone()
            } else {
                self.probe.clone()
            }
        }
    }

    #[test]
    fn non_pdf_never_reaches_ocr() {
        let runner = ScriptedRunner::new("ASCII text\n", Some(0));
        let mut session = Session::new();
        let outcome = open_file(
            "file:///tmp/missing.txt\r\n",
            &runner,
            &OcrConfig::default(),
            &mut session,
        );

        assert_eq!(outcome.message, StatusMessage::not_a_pdf());
        assert_eq!(outcome.inspection.path, "/tmp/missing.txt");
        assert_eq!(outcome.ocr, None);
        assert_eq!(runner.ocr_calls(), 0);
        assert_eq!(session.selected_pdf(), None);
    }

    #[test]
    fn successful_ocr_rewrites_in_place() {
        let runner = ScriptedRunner::new("PDF document, version 1.4\n", Some(0));
        let mut session = Session::new();
        let outcome = open_file(
            "file:///tmp/My%20Scan.pdf",
            &runner,
            &OcrConfig::default(),
            &mut session,
        );

        assert_eq!(outcome.message, StatusMessage::ocr_done());
        assert_eq!(session.selected_pdf(), Some("/tmp/My Scan.pdf"));
        assert_eq!(
            runner.calls.borrow().last().map(String::as_str),
            Some("ocrmypdf -r --output-type=pdf '/tmp/My Scan.pdf' '/tmp/My Scan.pdf'")
        );
    }

    #[test]
    fn non_zero_exit_is_reported_as_ocr_error() {
        let runner = ScriptedRunner::new("PDF document\n", Some(2));
        let outcome = open_file(
            "/tmp/a.pdf",
            &runner,
            &OcrConfig::default(),
            &mut Session::new(),
        );
        assert_eq!(outcome.ocr.and_then(|r| r.exit_code()), Some(2));
        assert_eq!(outcome.message, StatusMessage::ocr_failed());
    }

    #[test]
    fn unstartable_ocr_tool_gets_its_own_message() {
        let runner = ScriptedRunner::new("PDF document\n", None);
        let outcome = open_file(
            "/tmp/a.pdf",
            &runner,
            &OcrConfig::default(),
            &mut Session::new(),
        );
        assert_eq!(outcome.message, StatusMessage::ocr_unavailable());
    }

    #[test]
    fn killed_ocr_tool_is_a_failure() {
        let result = CommandResult {
            ok: true,
            stdout: Some(Vec::new()),
            stderr: Some(Vec::new()),
            exit: Some(ExitState::Signaled(15)),
        };
        assert_eq!(ocr_message(&result), StatusMessage::ocr_failed());
    }

    #[test]
    fn session_keeps_the_latest_pdf() {
        let runner = ScriptedRunner::new("PDF document\n", Some(0));
        let config = OcrConfig::default();
        let mut session = Session::new();
        open_file("/tmp/first.pdf", &runner, &config, &mut session);
        open_file("/tmp/second.pdf", &runner, &config, &mut session);
        open_file("/tmp/notes.txt", &ScriptedRunner::new("ASCII text", Some(0)), &config, &mut session);
        assert_eq!(session.selected_pdf(), Some("/tmp/second.pdf"));
    }
}
