use std::process::{Command, ExitStatus, Output, Stdio};

use tokio::sync::oneshot;

use super::text::bytes_to_string;

/// Configure la commande pour éviter l'ouverture d'une fenêtre console sur Windows.
pub fn configure_command_no_window(cmd: &mut Command) {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(target_os = "windows"))]
    let _ = cmd;
}

/// Erreur interne d'exécution, convertie en [`CommandResult`] à la frontière du wrapper.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("invalid command line: {0}")]
    Parse(#[from] shell_words::ParseError),
    #[error("command line is empty")]
    Empty,
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Mode de lancement d'une commande.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpawnMode {
    /// Attend la fin du process et capture stdout/stderr.
    #[default]
    Wait,
    /// Lance le process sans attendre ni capturer sa sortie.
    Detach,
}

/// État de sortie d'un process terminé.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitState {
    /// Le process s'est terminé avec ce code.
    Exited(i32),
    /// Le process a été tué par ce signal.
    Signaled(i32),
}

impl ExitState {
    /// Traduit le statut brut de la plateforme.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }

        Self::Exited(-1)
    }

    /// Code numérique unique: `0` en cas de succès, le code de sortie sinon,
    /// `128 + signal` pour un process tué.
    pub fn code(&self) -> i32 {
        match *self {
            Self::Exited(code) => code,
            Self::Signaled(signal) => 128 + signal,
        }
    }

    /// Indique une sortie propre.
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

/// Résultat normalisé d'une invocation de commande.
///
/// `ok` vaut `false` dès que l'analyse de la ligne de commande ou le lancement
/// a échoué; les autres champs sont alors vides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub ok: bool,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
    pub exit: Option<ExitState>,
}

impl CommandResult {
    /// Résultat d'une commande qui n'a pas pu être lancée.
    pub fn failed() -> Self {
        Self::default()
    }

    /// Unique point de construction à partir d'un lancement brut.
    pub fn normalize(outcome: Result<Option<Output>, SpawnError>) -> Self {
        match outcome {
            Ok(Some(output)) => Self {
                ok: true,
                stdout: Some(output.stdout),
                stderr: Some(output.stderr),
                exit: Some(ExitState::from_status(output.status)),
            },
            Ok(None) => Self {
                ok: true,
                ..Self::default()
            },
            Err(err) => {
                log::debug!("[shell] {}", err);
                Self::failed()
            }
        }
    }

    /// Code de sortie numérique, absent si le process n'a pas été attendu.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit.map(|exit| exit.code())
    }

    /// Indique que le process a été lancé et s'est terminé avec le code `0`.
    pub fn succeeded(&self) -> bool {
        self.ok && self.exit.is_some_and(|exit| exit.success())
    }

    /// Sortie standard lue comme texte.
    pub fn stdout_text(&self) -> Option<String> {
        bytes_to_string(self.stdout.as_deref())
    }

    /// Première ligne non vide de stderr (ou de stdout) pour les logs.
    pub fn failure_summary(&self) -> Option<String> {
        [self.stderr.as_deref(), self.stdout.as_deref()]
            .into_iter()
            .flatten()
            .map(String::from_utf8_lossy)
            .find_map(|text| {
                text.lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string)
            })
    }
}

/// Découpe une ligne de commande en argv selon les règles du shell POSIX, sans expansion.
pub fn parse_command_line(command_line: &str) -> Result<Vec<String>, SpawnError> {
    let argv = shell_words::split(command_line)?;
    if argv.is_empty() {
        return Err(SpawnError::Empty);
    }
    Ok(argv)
}

/// Construit la commande système correspondant à un argv déjà analysé.
fn build_command(argv: &[String]) -> Command {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    configure_command_no_window(&mut cmd);
    cmd
}

/// Lance la commande; `Ok(None)` signifie un process détaché.
fn execute(command_line: &str, mode: SpawnMode) -> Result<Option<Output>, SpawnError> {
    let argv = parse_command_line(command_line)?;
    let mut cmd = build_command(&argv);
    let spawn_error = |source: std::io::Error| SpawnError::Spawn {
        program: argv[0].clone(),
        source,
    };

    match mode {
        SpawnMode::Wait => cmd.output().map(Some).map_err(spawn_error),
        SpawnMode::Detach => {
            let mut child = cmd
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .map_err(spawn_error)?;
            log::debug!("[shell] detached pid={} program={}", child.id(), argv[0]);
            std::thread::spawn(move || {
                let _ = child.wait();
            });
            Ok(None)
        }
    }
}

/// Exécute une ligne de commande de manière synchrone.
pub fn run_command(command_line: &str) -> CommandResult {
    run_command_with(command_line, SpawnMode::Wait)
}

/// Exécute une ligne de commande dans le mode demandé.
///
/// Aucune erreur n'est propagée: une ligne mal formée ou un lancement impossible
/// donnent `CommandResult::failed()`. Le mode synchrone bloque sans timeout.
pub fn run_command_with(command_line: &str, mode: SpawnMode) -> CommandResult {
    CommandResult::normalize(execute(command_line, mode))
}

/// Issue d'une commande annulable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellableOutcome {
    Finished(CommandResult),
    Cancelled,
}

/// Exécute une ligne de commande sur le runtime tokio en écoutant un signal d'annulation.
///
/// Le process est tué si `cancel` est déclenché avant sa fin. Un émetteur
/// abandonné sans envoi n'annule pas la commande.
pub async fn run_command_cancellable(
    command_line: &str,
    cancel: oneshot::Receiver<()>,
) -> CancellableOutcome {
    let argv = match parse_command_line(command_line) {
        Ok(argv) => argv,
        Err(err) => return CancellableOutcome::Finished(CommandResult::normalize(Err(err))),
    };

    let mut cmd = tokio::process::Command::from(build_command(&argv));
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            return CancellableOutcome::Finished(CommandResult::normalize(Err(
                SpawnError::Spawn {
                    program: argv[0].clone(),
                    source,
                },
            )))
        }
    };
    log::info!("[shell] spawned pid={:?} program={}", child.id(), argv[0]);

    let cancelled = async {
        if cancel.await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        output = child.wait_with_output() => {
            let outcome = output.map(Some).map_err(|source| SpawnError::Spawn {
                program: argv[0].clone(),
                source,
            });
            CancellableOutcome::Finished(CommandResult::normalize(outcome))
        }
        _ = cancelled => {
            log::info!("[shell] {}: command was cancelled", argv[0]);
            CancellableOutcome::Cancelled
        }
    }
}

/// Point d'injection des exécutions de commandes.
pub trait CommandRunner {
    /// Exécute la ligne de commande de manière synchrone.
    fn run(&self, command_line: &str) -> CommandResult;
}

/// Exécuteur réel basé sur [`run_command`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> CommandResult {
        run_command(command_line)
    }
}
