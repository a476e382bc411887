use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use crate::utils::process::configure_command_no_window;

use super::diagnostics::{
    AttemptOutcome, BinaryErrorCode, BinaryResolutionAttempt, BinaryResolveDebugInfo,
    BinaryResolveError, CandidateSource,
};

static RESOURCE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialise le répertoire de ressources utilisé pour résoudre les binaires embarqués.
pub fn init_resource_dir(dir: PathBuf) {
    let _ = RESOURCE_DIR.set(dir);
}

/// Retourne la liste ordonnée des emplacements candidats pour un binaire donné.
fn binary_candidates(bin: &str) -> Vec<PathBuf> {
    let mut paths = vec![
        Path::new("binaries").join(bin),
        Path::new("resources").join("binaries").join(bin),
    ];

    if let Some(resource_dir) = RESOURCE_DIR.get() {
        paths.push(resource_dir.join("binaries").join(bin));
        paths.push(resource_dir.join("resources").join("binaries").join(bin));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            paths.push(dir.join("binaries").join(bin));

            #[cfg(target_os = "macos")]
            {
                paths.push(dir.join("../Resources/binaries").join(bin));
            }

            #[cfg(target_os = "linux")]
            {
                let package = env!("CARGO_PKG_NAME");
                paths.push(dir.join(format!("../lib/{package}/binaries")).join(bin));
                paths.push(dir.join("../resources/binaries").join(bin));
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(appdir) = std::env::var("APPDIR") {
            let package = env!("CARGO_PKG_NAME");
            paths.push(
                Path::new(&appdir)
                    .join(format!("usr/lib/{package}/binaries"))
                    .join(bin),
            );
        }

        // ocrmypdf est souvent installé via pipx dans ~/.local/bin.
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(Path::new(&home).join(".local/bin").join(bin));
        }
        paths.push(Path::new("/usr/local/bin").join(bin));
        paths.push(Path::new("/usr/bin").join(bin));
        paths.push(Path::new("/bin").join(bin));
    }

    #[cfg(target_os = "macos")]
    {
        paths.push(Path::new("/opt/homebrew/bin").join(bin));
        paths.push(Path::new("/usr/local/bin").join(bin));
        paths.push(Path::new("/opt/local/bin").join(bin));
    }

    dedupe_paths(paths)
}

/// Supprime les chemins dupliqués en conservant l'ordre.
fn dedupe_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.to_string_lossy().to_string()))
        .collect()
}

/// Retourne la première ligne non vide d'un texte.
pub fn first_non_empty_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Classe une erreur de lancement de process en résultat applicatif stable.
fn classify_spawn_error(error: &std::io::Error) -> (AttemptOutcome, String) {
    match error.kind() {
        ErrorKind::NotFound => (AttemptOutcome::Missing, "Binary not found".to_string()),
        ErrorKind::PermissionDenied => (
            AttemptOutcome::NotExecutable,
            "Permission denied while executing binary".to_string(),
        ),
        _ => {
            let msg = error.to_string();
            let lower = msg.to_lowercase();
            if lower.contains("exec format error")
                || lower.contains("bad cpu type")
                || lower.contains("cannot execute")
            {
                (AttemptOutcome::NotExecutable, msg)
            } else {
                (AttemptOutcome::ExecFailed, msg)
            }
        }
    }
}

/// Vérifie qu'un binaire répond à `--version` et renvoie un diagnostic exploitable.
fn test_binary_version(binary: &str) -> Result<(), (AttemptOutcome, String)> {
    let mut cmd = Command::new(binary);
    cmd.arg("--version");
    configure_command_no_window(&mut cmd);

    match cmd.output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            let detail = [&output.stderr, &output.stdout]
                .into_iter()
                .map(|bytes| first_non_empty_line(&String::from_utf8_lossy(bytes)))
                .find(|line| !line.is_empty())
                .unwrap_or_else(|| "Binary returned non-zero exit status".to_string());
            Err((AttemptOutcome::ExecFailed, detail))
        }
        Err(error) => Err(classify_spawn_error(&error)),
    }
}

/// Teste un candidat et enregistre la tentative.
fn try_candidate(
    candidate: String,
    source: CandidateSource,
    attempts: &mut Vec<BinaryResolutionAttempt>,
) -> Option<String> {
    let (outcome, detail) = match test_binary_version(&candidate) {
        Ok(()) => (AttemptOutcome::Ok, None),
        Err((outcome, detail)) => (outcome, Some(detail)),
    };
    attempts.push(BinaryResolutionAttempt {
        candidate: candidate.clone(),
        source,
        outcome,
        detail,
    });
    (outcome == AttemptOutcome::Ok).then_some(candidate)
}

/// Tente de résoudre un binaire et retourne le chemin retenu plus les tentatives.
fn resolve_binary_with_attempts(
    name: &str,
) -> Result<(String, Vec<BinaryResolutionAttempt>), BinaryResolveError> {
    let bin = if cfg!(target_os = "windows") {
        format!("{name}.exe")
    } else {
        name.to_string()
    };

    let mut attempts = Vec::new();

    for path in binary_candidates(&bin) {
        if !path.exists() {
            attempts.push(BinaryResolutionAttempt {
                candidate: path.to_string_lossy().to_string(),
                source: CandidateSource::BundledOrKnownPath,
                outcome: AttemptOutcome::Missing,
                detail: None,
            });
            continue;
        }

        let canonical = path.canonicalize().unwrap_or(path);
        let candidate = canonical.to_string_lossy().to_string();
        if let Some(found) =
            try_candidate(candidate, CandidateSource::BundledOrKnownPath, &mut attempts)
        {
            log::info!("[binaries] resolved {} -> {}", name, found);
            return Ok((found, attempts));
        }
    }

    if let Some(found) = try_candidate(bin.clone(), CandidateSource::SystemPath, &mut attempts) {
        log::info!("[binaries] resolved {} from PATH", name);
        return Ok((found, attempts));
    }

    let details = attempts
        .iter()
        .find_map(|a| a.detail.clone())
        .unwrap_or_else(|| format!("No usable binary found for {name}"));
    let code = BinaryErrorCode::from_attempts(&attempts);
    log::warn!("[binaries] unable to resolve {}: {:?} {}", name, code, details);

    Err(BinaryResolveError {
        code,
        details,
        attempts,
    })
}

/// Retourne le chemin du binaire ou une erreur structurée.
pub fn resolve_binary_detailed(name: &str) -> Result<String, BinaryResolveError> {
    resolve_binary_with_attempts(name).map(|(path, _)| path)
}

/// Retourne le chemin du binaire quand il est résolu, sinon `None`.
pub fn resolve_binary(name: &str) -> Option<String> {
    resolve_binary_detailed(name).ok()
}

/// Retourne un diagnostic complet de résolution d'un binaire.
pub fn resolve_binary_debug(name: &str) -> BinaryResolveDebugInfo {
    match resolve_binary_with_attempts(name) {
        Ok((path, attempts)) => BinaryResolveDebugInfo {
            name: name.to_string(),
            resolved_path: Some(path),
            error_code: None,
            error_details: None,
            attempts,
        },
        Err(err) => BinaryResolveDebugInfo {
            name: name.to_string(),
            resolved_path: None,
            error_code: Some(err.code),
            error_details: Some(err.details),
            attempts: err.attempts,
        },
    }
}
