//! Loading documents from disk through `FileDocumentSource`.

use std::io::Write;
use std::sync::Arc;

use speakdoc_core::{
    DocumentKind, DocumentPortError, DocumentSource, PdfTextProvider, PositionedText,
};
use speakdoc_extract::FileDocumentSource;
use tempfile::TempDir;

fn write_docx(path: &std::path::Path, document_xml: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document_xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

struct OnePage;

impl PdfTextProvider for OnePage {
    fn page_items(&self, _bytes: &[u8]) -> Result<Vec<Vec<PositionedText>>, DocumentPortError> {
        Ok(vec![vec![
            PositionedText::new("Chapter 1", 720.0),
            PositionedText::new("It began.", 690.0),
        ]])
    }
}

#[tokio::test]
async fn loads_plain_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "Dr. Smith left.\nHe returned.").unwrap();

    let doc = FileDocumentSource::new().load(&path).await.unwrap();
    assert_eq!(doc.kind, DocumentKind::PlainText);
    assert_eq!(doc.readable_text(), Some("Dr. Smith left.\nHe returned."));
}

#[tokio::test]
async fn loads_docx_body() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("letter.docx");
    write_docx(
        &path,
        r#"<?xml version="1.0"?><w:document><w:body><w:p><w:r><w:t>Dear NASA,</w:t></w:r></w:p><w:p><w:r><w:t xml:space="preserve">Thanks &amp; regards.</w:t></w:r></w:p></w:body></w:document>"#,
    );

    let doc = FileDocumentSource::new().load(&path).await.unwrap();
    assert_eq!(doc.kind, DocumentKind::WordDoc);
    assert_eq!(doc.text.as_deref(), Some("Dear NASA,\n\nThanks & regards."));
}

#[tokio::test]
async fn docx_without_body_is_an_extraction_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.docx");
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("docProps/app.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<Properties/>").unwrap();
    zip.finish().unwrap();

    let err = FileDocumentSource::new().load(&path).await.unwrap_err();
    assert!(matches!(
        err,
        DocumentPortError::Extraction {
            kind: DocumentKind::WordDoc,
            ..
        }
    ));
}

#[tokio::test]
async fn images_load_without_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let doc = FileDocumentSource::new().load(&path).await.unwrap();
    assert_eq!(doc.kind, DocumentKind::Image);
    assert!(doc.readable_text().is_none());
}

#[tokio::test]
async fn pdf_needs_provider() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("paper.pdf");
    std::fs::write(&path, b"%PDF-1.7").unwrap();

    let err = FileDocumentSource::new().load(&path).await.unwrap_err();
    assert!(matches!(err, DocumentPortError::NoPdfProvider));

    let doc = FileDocumentSource::new()
        .with_pdf_provider(Arc::new(OnePage))
        .load(&path)
        .await
        .unwrap();
    assert_eq!(doc.text.as_deref(), Some("Chapter 1\nIt began.\n"));
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.tar.gz");
    std::fs::write(&path, b"\x1f\x8b").unwrap();

    let err = FileDocumentSource::new().load(&path).await.unwrap_err();
    assert!(matches!(err, DocumentPortError::Unsupported(_)));
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = FileDocumentSource::new()
        .load(&dir.path().join("gone.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentPortError::Io(_)));
}
