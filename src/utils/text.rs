/// Convertit une suite de codes (octets d'une sortie de process par exemple) en texte.
///
/// Chaque code devient le caractère de même valeur, ce qui revient à lire des
/// octets en Latin-1. Un code hors de la plage Unicode devient `U+FFFD`.
pub fn bytes_to_string<T>(codes: Option<&[T]>) -> Option<String>
where
    T: Copy + Into<u32>,
{
    codes.map(|codes| {
        codes
            .iter()
            .map(|&code| char::from_u32(code.into()).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    })
}

/// Convertit un texte en la suite des codes de ses caractères.
pub fn string_to_bytes(text: Option<&str>) -> Option<Vec<u32>> {
    text.map(|text| text.chars().map(u32::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_pass_through() {
        assert_eq!(bytes_to_string::<u8>(None), None);
        assert_eq!(string_to_bytes(None), None);
    }

    #[test]
    fn process_output_bytes_become_latin1_text() {
        let stdout = b"PDF document, version 1.4\n";
        assert_eq!(
            bytes_to_string(Some(&stdout[..])).as_deref(),
            Some("PDF document, version 1.4\n")
        );
        assert_eq!(bytes_to_string(Some(&[0xE9u8][..])).as_deref(), Some("é"));
    }

    #[test]
    fn round_trip_for_single_byte_characters() {
        let all: String = (0u8..=255).map(char::from).collect();
        for text in ["", "PDF", "r\u{e9}sum\u{e9}\r\n\0", all.as_str()] {
            let codes = string_to_bytes(Some(text));
            assert_eq!(bytes_to_string(codes.as_deref()).as_deref(), Some(text));
        }
    }

    #[test]
    fn codes_keep_character_order() {
        assert_eq!(string_to_bytes(Some("PDF")), Some(vec![80, 68, 70]));
    }
}
