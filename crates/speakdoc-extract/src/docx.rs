//! Raw text extraction from `.docx` archives.
//!
//! Only the main document part is read. Runs of `<w:t>` text are
//! concatenated; each paragraph is followed by a blank line, tabs and line
//! breaks become `\t` and `\n`. Formatting, headers and footnotes are
//! ignored.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

// Tab stop definitions (`<w:tabs>`) live in paragraph properties and must not
// be mistaken for tab characters, so they are matched and skipped first.
static BODY_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<w:tabs\b.*?</w:tabs>|<w:t(?:\s[^>]*)?>(?P<text>.*?)</w:t>|(?P<tab><w:tab\b[^>]*/>)|(?P<br><w:(?:br|cr)\b[^>]*/>)|(?P<para></w:p>)",
    )
    .expect("docx token regex is valid")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#x(?P<hex>[0-9a-fA-F]+)|#(?P<dec>[0-9]+)|(?P<name>amp|lt|gt|quot|apos));")
        .expect("xml entity regex is valid")
});

/// Extract the raw text of a `.docx` document.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Err(ExtractError::MissingDocumentPart),
        Err(e) => return Err(e.into()),
    }

    let text = body_text(&xml);
    tracing::debug!(xml_len = xml.len(), text_len = text.len(), "Extracted DOCX body");
    Ok(text)
}

fn body_text(xml: &str) -> String {
    let mut out = String::new();
    for caps in BODY_TOKEN_RE.captures_iter(xml) {
        if let Some(run) = caps.name("text") {
            out.push_str(&decode_entities(run.as_str()));
        } else if caps.name("tab").is_some() {
            out.push('\t');
        } else if caps.name("br").is_some() {
            out.push('\n');
        } else if caps.name("para").is_some() {
            out.push_str("\n\n");
        }
    }
    out.trim_end().to_string()
}

fn decode_entities(raw: &str) -> String {
    ENTITY_RE
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            let code = if let Some(hex) = caps.name("hex") {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.name("dec") {
                dec.as_str().parse().ok()
            } else {
                None
            };
            if let Some(code) = code {
                return char::from_u32(code).map_or_else(String::new, String::from);
            }
            match caps.name("name").map(|m| m.as_str()) {
                Some("amp") => "&",
                Some("lt") => "<",
                Some("gt") => ">",
                Some("quot") => "\"",
                Some("apos") => "'",
                _ => "",
            }
            .to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_blank_lines() {
        let xml = r#"<w:body><w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world.</w:t></w:r></w:p><w:p><w:r><w:t>Second.</w:t></w:r></w:p></w:body>"#;
        assert_eq!(body_text(xml), "Hello world.\n\nSecond.");
    }

    #[test]
    fn tab_stops_are_not_tabs() {
        let xml = r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>"#;
        assert_eq!(body_text(xml), "A\tB\nC");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(decode_entities("R&amp;D &lt;x&gt; &#65;&#x42;"), "R&D <x> AB");
    }

    #[test]
    fn rejects_non_zip_bytes() {
        assert!(matches!(
            extract_docx_text(b"plain text"),
            Err(ExtractError::Archive(_))
        ));
    }
}
