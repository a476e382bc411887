use serde::Serialize;

/// Provenance d'un candidat de résolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Binaire embarqué ou répertoire système connu.
    BundledOrKnownPath,
    /// Nom nu recherché dans le `PATH`.
    SystemPath,
}

/// Résultat d'une tentative de résolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Ok,
    Missing,
    NotExecutable,
    ExecFailed,
}

/// Décrit une tentative de résolution d'un binaire.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryResolutionAttempt {
    /// Chemin ou nom tenté.
    pub candidate: String,
    pub source: CandidateSource,
    pub outcome: AttemptOutcome,
    /// Détail éventuel en cas d'erreur.
    pub detail: Option<String>,
}

/// Code d'erreur stable d'une résolution échouée.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinaryErrorCode {
    BinaryNotFound,
    BinaryNotExecutable,
    BinaryExecFailed,
}

impl BinaryErrorCode {
    /// Choisit le code le plus parlant au vu des tentatives effectuées.
    pub fn from_attempts(attempts: &[BinaryResolutionAttempt]) -> Self {
        let has = |outcome| attempts.iter().any(|a| a.outcome == outcome);
        if has(AttemptOutcome::NotExecutable) {
            Self::BinaryNotExecutable
        } else if has(AttemptOutcome::ExecFailed) {
            Self::BinaryExecFailed
        } else {
            Self::BinaryNotFound
        }
    }
}

/// Erreur structurée de résolution d'un binaire.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{code:?}: {details}")]
pub struct BinaryResolveError {
    pub code: BinaryErrorCode,
    /// Message de diagnostic principal.
    pub details: String,
    /// Historique complet des tentatives.
    pub attempts: Vec<BinaryResolutionAttempt>,
}

/// Information de debug complète exposée pour diagnostic.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryResolveDebugInfo {
    /// Nom logique du binaire demandé.
    pub name: String,
    pub resolved_path: Option<String>,
    pub error_code: Option<BinaryErrorCode>,
    pub error_details: Option<String>,
    pub attempts: Vec<BinaryResolutionAttempt>,
}
