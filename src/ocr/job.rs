use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::utils::process::{run_command_cancellable, CancellableOutcome};

use super::message::StatusMessage;
use super::ocr_message;

/// Tâche OCR unique en arrière-plan, annulable.
///
/// Au plus une tâche tourne à la fois; l'émetteur d'annulation est conservé
/// tant qu'elle n'est pas terminée.
#[derive(Debug, Default)]
pub struct OcrJob {
    slot: Mutex<JobSlot>,
}

#[derive(Debug, Default)]
struct JobSlot {
    running: bool,
    cancel: Option<oneshot::Sender<()>>,
}

/// Jeton rendu par [`OcrJob::begin`]; libère la place à la destruction.
pub struct OcrJobGuard<'a> {
    job: &'a OcrJob,
    cancel_rx: Option<oneshot::Receiver<()>>,
}

impl OcrJob {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, JobSlot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Réserve la place; `None` si une tâche est déjà en cours.
    pub fn begin(&self) -> Option<OcrJobGuard<'_>> {
        let mut slot = self.lock_slot();
        if slot.running {
            return None;
        }
        let (tx, rx) = oneshot::channel();
        slot.running = true;
        slot.cancel = Some(tx);
        Some(OcrJobGuard {
            job: self,
            cancel_rx: Some(rx),
        })
    }

    /// Demande l'annulation de la tâche en cours; `false` s'il n'y en a pas.
    ///
    /// La place reste occupée jusqu'à ce que la tâche annulée se termine.
    pub fn cancel(&self) -> bool {
        match self.lock_slot().cancel.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_slot().running
    }
}

impl OcrJobGuard<'_> {
    /// Exécute la commande OCR et traduit l'issue en message.
    pub async fn run(mut self, command_line: &str) -> StatusMessage {
        let Some(cancel_rx) = self.cancel_rx.take() else {
            return StatusMessage::ocr_unavailable();
        };
        match run_command_cancellable(command_line, cancel_rx).await {
            CancellableOutcome::Finished(result) => ocr_message(&result),
            CancellableOutcome::Cancelled => StatusMessage::ocr_cancelled(),
        }
    }
}

impl Drop for OcrJobGuard<'_> {
    /// Libère la place sans propager d'erreur.
    fn drop(&mut self) {
        let mut slot = self.job.lock_slot();
        slot.running = false;
        slot.cancel = None;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn only_one_job_at_a_time() {
        let job = OcrJob::new();
        let guard = job.begin().unwrap();
        assert!(job.is_running());
        assert!(job.begin().is_none());
        drop(guard);
        assert!(!job.is_running());
        assert!(job.begin().is_some());
    }

    #[test]
    fn cancel_without_job_is_a_no_op() {
        assert!(!OcrJob::new().cancel());
    }

    #[test]
    fn cancelled_job_keeps_its_slot_until_dropped() {
        let job = OcrJob::new();
        let guard = job.begin().unwrap();
        assert!(job.cancel());
        assert!(!job.cancel());
        assert!(job.is_running());
        assert!(job.begin().is_none());
        drop(guard);
        assert!(job.begin().is_some());
    }

    #[tokio::test]
    async fn finished_job_maps_exit_code() {
        let job = OcrJob::new();
        let message = job.begin().unwrap().run("sh -c 'exit 0'").await;
        assert_eq!(message, StatusMessage::ocr_done());
        let message = job.begin().unwrap().run("sh -c 'exit 2'").await;
        assert_eq!(message, StatusMessage::ocr_failed());
        assert!(!job.is_running());
    }

    #[tokio::test]
    async fn running_job_can_be_cancelled() {
        let job = Arc::new(OcrJob::new());
        let runner = Arc::clone(&job);
        let task = tokio::spawn(async move {
            let guard = runner.begin().unwrap();
            guard.run("sleep 30").await
        });

        while !job.is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(job.cancel());
        assert_eq!(task.await.unwrap(), StatusMessage::ocr_cancelled());
        assert!(!job.is_running());
    }
}
