use speakdoc_core::{DocumentKind, ExtractedDocument, PdfTextProvider};

use crate::docx::extract_docx_text;
use crate::error::ExtractError;
use crate::pdf::join_pages;
use crate::text::decode_text;

/// Extract the readable text of a document of a known kind.
///
/// `pdf` is only consulted for [`DocumentKind::Pdf`]; without it PDF
/// extraction fails with [`ExtractError::NeedsPdfCollaborator`].
pub fn extract(
    kind: DocumentKind,
    bytes: &[u8],
    pdf: Option<&dyn PdfTextProvider>,
    line_threshold: f32,
) -> Result<ExtractedDocument, ExtractError> {
    let text = match kind {
        DocumentKind::PlainText => decode_text(bytes),
        DocumentKind::WordDoc => extract_docx_text(bytes)?,
        DocumentKind::Pdf => {
            let provider = pdf.ok_or(ExtractError::NeedsPdfCollaborator)?;
            let pages = provider
                .page_items(bytes)
                .map_err(|e| ExtractError::Pdf(e.to_string()))?;
            tracing::debug!(pages = pages.len(), "Reconstructing PDF text");
            join_pages(&pages, line_threshold)
        }
        DocumentKind::Image => return Ok(ExtractedDocument::without_text(kind)),
    };

    Ok(ExtractedDocument {
        kind,
        text: Some(text),
    })
}

#[cfg(test)]
mod tests {
    use speakdoc_core::{DocumentPortError, PositionedText};

    use super::*;

    struct FixedPages(Vec<Vec<PositionedText>>);

    impl PdfTextProvider for FixedPages {
        fn page_items(&self, _bytes: &[u8]) -> Result<Vec<Vec<PositionedText>>, DocumentPortError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenPdf;

    impl PdfTextProvider for BrokenPdf {
        fn page_items(&self, _bytes: &[u8]) -> Result<Vec<Vec<PositionedText>>, DocumentPortError> {
            Err(DocumentPortError::Unsupported("encrypted".to_string()))
        }
    }

    #[test]
    fn plain_text_is_verbatim() {
        let doc = extract(DocumentKind::PlainText, b"Hi.\nThere.", None, 5.0).unwrap();
        assert_eq!(doc.text.as_deref(), Some("Hi.\nThere."));
    }

    #[test]
    fn images_have_no_text() {
        let doc = extract(DocumentKind::Image, &[0x89, b'P', b'N', b'G'], None, 5.0).unwrap();
        assert_eq!(doc, ExtractedDocument::without_text(DocumentKind::Image));
    }

    #[test]
    fn pdf_without_provider_fails() {
        assert!(matches!(
            extract(DocumentKind::Pdf, b"%PDF-1.7", None, 5.0),
            Err(ExtractError::NeedsPdfCollaborator)
        ));
    }

    #[test]
    fn pdf_pages_are_reconstructed() {
        let provider = FixedPages(vec![vec![
            PositionedText::new("Heading", 800.0),
            PositionedText::new("First line.", 760.0),
        ]]);
        let doc = extract(DocumentKind::Pdf, b"%PDF", Some(&provider), 5.0).unwrap();
        assert_eq!(doc.text.as_deref(), Some("Heading\nFirst line.\n"));
    }

    #[test]
    fn pdf_provider_errors_are_wrapped() {
        let err = extract(DocumentKind::Pdf, b"%PDF", Some(&BrokenPdf), 5.0).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(reason) if reason.contains("encrypted")));
    }
}
