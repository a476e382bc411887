/// Préfixe des URI locales reçues par glisser-déposer.
const FILE_URI_PREFIX: &str = "file://";

/// Caractères réservés qu'un décodage d'URI complète laisse encodés.
const RESERVED_URI_CHARS: &[u8] = b";/?:@&=+$,#";

/// Convertit un caractère hexadécimal ASCII en valeur binaire.
fn from_hex(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Décode les séquences `%xx` d'une URI complète.
///
/// Retourne `None` si une séquence est mal formée ou si les octets décodés
/// ne forment pas de l'UTF-8 valide. Les séquences désignant un caractère
/// réservé restent encodées.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        if i + 2 >= bytes.len() {
            return None;
        }
        let value = (from_hex(bytes[i + 1])? << 4) | from_hex(bytes[i + 2])?;
        if RESERVED_URI_CHARS.contains(&value) {
            out.extend_from_slice(&bytes[i..i + 3]);
        } else {
            out.push(value);
        }
        i += 3;
    }

    String::from_utf8(out).ok()
}

/// Normalise un chemin brut provenant d'un glisser-déposer ou du sélecteur de fichier.
///
/// Le décodage est tenté en premier et ignoré s'il échoue; le préfixe
/// `file://` est ensuite retiré puis les `\r`/`\n` finaux sont supprimés.
/// L'existence du chemin n'est pas vérifiée.
pub fn normalize_uri(raw: &str) -> String {
    let decoded = percent_decode(raw).unwrap_or_else(|| raw.to_string());
    let path = decoded.strip_prefix(FILE_URI_PREFIX).unwrap_or(&decoded);
    path.trim_end_matches(['\r', '\n']).to_string()
}

/// Indique si le chemin se termine par `.pdf`, sans tenir compte de la casse.
pub fn has_pdf_extension(path: &str) -> bool {
    let start = path
        .char_indices()
        .rev()
        .nth(3)
        .map(|(index, _)| index)
        .unwrap_or(0);
    path[start..].to_lowercase() == ".pdf"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_and_line_endings() {
        assert_eq!(normalize_uri("file:///tmp/a.pdf\r\n"), "/tmp/a.pdf");
        assert_eq!(normalize_uri("file:///tmp/a.pdf\n\r\n\n"), "/tmp/a.pdf");
    }

    #[test]
    fn clean_path_is_untouched() {
        assert_eq!(
            normalize_uri("/tmp/already-clean.pdf"),
            "/tmp/already-clean.pdf"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "file:///home/me/My%20Scans/r%C3%A9sum%C3%A9.pdf\r\n",
            "/tmp/already-clean.pdf",
            "file:///tmp/report\n",
            "relative/file.PDF",
            "",
            "\r\n",
        ] {
            let once = normalize_uri(raw);
            assert_eq!(normalize_uri(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn decodes_escapes_before_stripping_prefix() {
        assert_eq!(
            normalize_uri("file:///home/me/My%20Scans/r%C3%A9sum%C3%A9.pdf"),
            "/home/me/My Scans/résumé.pdf"
        );
        assert_eq!(normalize_uri("file:///tmp/a.pdf%0D%0A"), "/tmp/a.pdf");
    }

    #[test]
    fn reserved_escapes_stay_encoded() {
        assert_eq!(normalize_uri("file:///tmp/a%23b%2Fc.pdf"), "/tmp/a%23b%2Fc.pdf");
    }

    #[test]
    fn malformed_escapes_keep_original_text() {
        assert_eq!(normalize_uri("file:///tmp/100%.pdf"), "/tmp/100%.pdf");
        assert_eq!(normalize_uri("file:///tmp/%zz%20.pdf"), "/tmp/%zz%20.pdf");
        assert_eq!(normalize_uri("file:///tmp/%C3.pdf"), "/tmp/%C3.pdf");
    }

    #[test]
    fn prefix_is_only_removed_at_start() {
        assert_eq!(normalize_uri("/x/file:///y"), "/x/file:///y");
    }

    #[test]
    fn extension_check_handles_short_and_mixed_case_paths() {
        assert!(has_pdf_extension("/tmp/REPORT.PdF"));
        assert!(has_pdf_extension(".pdf"));
        assert!(!has_pdf_extension("pdf"));
        assert!(!has_pdf_extension(""));
        assert!(!has_pdf_extension("a"));
        assert!(!has_pdf_extension("/tmp/notes.txt"));
        assert!(!has_pdf_extension("/tmp/archive.pdf.gz"));
    }
}
