//! Gabarits des deux commandes externes utilisées par l'application.

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::binaries;

/// Sonde de type de contenu par défaut.
pub const DEFAULT_PROBE_PROGRAM: &str = "file";
/// Outil OCR par défaut.
pub const DEFAULT_OCR_PROGRAM: &str = "ocrmypdf";
/// Gabarit par défaut de la sonde de type.
pub const DEFAULT_PROBE_TEMPLATE: &str = "{program} -b {input}";
/// Gabarit par défaut de l'OCR, réécriture en place.
pub const DEFAULT_OCR_TEMPLATE: &str = "{program} -r --output-type=pdf {input} {output}";

/// Configuration des commandes externes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcrConfig {
    /// Programme (nom ou chemin) de la sonde de type.
    pub probe_program: String,
    /// Programme (nom ou chemin) de l'outil OCR.
    pub ocr_program: String,
    /// Gabarit de la sonde; `{program}` et `{input}` sont substitués.
    pub probe_template: String,
    /// Gabarit de l'OCR; `{program}`, `{input}` et `{output}` sont substitués.
    pub ocr_template: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            probe_program: DEFAULT_PROBE_PROGRAM.to_string(),
            ocr_program: DEFAULT_OCR_PROGRAM.to_string(),
            probe_template: DEFAULT_PROBE_TEMPLATE.to_string(),
            ocr_template: DEFAULT_OCR_TEMPLATE.to_string(),
        }
    }
}

impl OcrConfig {
    /// Remplace les noms de programmes par leur chemin résolu quand il existe.
    pub fn resolve_programs(mut self) -> Self {
        for program in [&mut self.probe_program, &mut self.ocr_program] {
            if let Some(path) = binaries::resolve_binary(program) {
                *program = path;
            }
        }
        self
    }

    /// Ligne de commande de la sonde pour `path`.
    pub fn probe_command(&self, path: &str) -> String {
        render_template(
            &self.probe_template,
            &[("program", &self.probe_program), ("input", path)],
        )
    }

    /// Ligne de commande OCR réécrivant `path` en place.
    pub fn ocr_command(&self, path: &str) -> String {
        render_template(
            &self.ocr_template,
            &[
                ("program", &self.ocr_program),
                ("input", path),
                ("output", path),
            ],
        )
    }
}

/// Configuration partagée dont les programmes ne sont résolus qu'au premier accès.
///
/// La résolution lance `--version` sur chaque candidat; elle ne doit pas
/// tourner sur le thread de l'interface.
#[derive(Debug, Default)]
pub struct LazyOcrConfig {
    base: OcrConfig,
    resolved: OnceLock<OcrConfig>,
}

impl LazyOcrConfig {
    pub fn new(base: OcrConfig) -> Self {
        Self {
            base,
            resolved: OnceLock::new(),
        }
    }

    /// Configuration résolue; bloque le premier appelant pendant la résolution.
    pub fn get(&self) -> &OcrConfig {
        self.resolved.get_or_init(|| {
            let config = self.base.clone().resolve_programs();
            log::info!(
                "[config] probe={} ocr={}",
                config.probe_program,
                config.ocr_program
            );
            config
        })
    }

    /// Indique si la résolution a déjà eu lieu.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

/// Substitue chaque `{name}` connu par la valeur correspondante citée pour le shell.
///
/// Le gabarit est parcouru une seule fois: une valeur substituée n'est jamais
/// réinterprétée. Les accolades inconnues sont recopiées telles quelles.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = tail.find('}').and_then(|end| {
            let name = &tail[1..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });

        match placeholder {
            Some((end, value)) => {
                let quoted: Cow<'_, str> = shell_words::quote(value);
                rendered.push_str(&quoted);
                rest = &tail[end + 1..];
            }
            None => {
                rendered.push('{');
                rest = &tail[1..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}
