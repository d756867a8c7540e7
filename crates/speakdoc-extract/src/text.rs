const UTF8_BOM: char = '\u{feff}';

/// Decode plain text bytes.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; a leading byte
/// order mark is dropped. Everything else is kept verbatim.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix(UTF8_BOM).unwrap_or(&text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_text_verbatim() {
        assert_eq!(decode_text(b"Line one.\n\n  Line two."), "Line one.\n\n  Line two.");
    }

    #[test]
    fn strips_bom() {
        assert_eq!(decode_text("\u{feff}Hello".as_bytes()), "Hello");
    }

    #[test]
    fn replaces_invalid_utf8() {
        assert_eq!(decode_text(&[b'o', b'k', 0xff]), "ok\u{fffd}");
    }
}
