use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use speakdoc_core::{
    DEFAULT_PDF_LINE_THRESHOLD, DocumentKind, DocumentPortError, DocumentSource,
    ExtractedDocument, PdfTextProvider,
};

use crate::extractor::extract;

/// [`DocumentSource`] reading documents from the local filesystem.
#[derive(Clone)]
pub struct FileDocumentSource {
    pdf: Option<Arc<dyn PdfTextProvider>>,
    line_threshold: f32,
}

impl Default for FileDocumentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDocumentSource {
    /// Source without a PDF collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pdf: None,
            line_threshold: DEFAULT_PDF_LINE_THRESHOLD,
        }
    }

    /// Use `provider` to obtain PDF page text.
    #[must_use]
    pub fn with_pdf_provider(mut self, provider: Arc<dyn PdfTextProvider>) -> Self {
        self.pdf = Some(provider);
        self
    }

    /// Override the PDF line reconstruction threshold.
    #[must_use]
    pub const fn with_line_threshold(mut self, threshold: f32) -> Self {
        self.line_threshold = threshold;
        self
    }
}

impl std::fmt::Debug for FileDocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDocumentSource")
            .field("pdf", &self.pdf.is_some())
            .field("line_threshold", &self.line_threshold)
            .finish()
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn load(&self, path: &Path) -> Result<ExtractedDocument, DocumentPortError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let Some(kind) = DocumentKind::detect(file_name, None) else {
            tracing::warn!(path = %path.display(), "Unsupported document type");
            return Err(DocumentPortError::Unsupported(path.display().to_string()));
        };

        if !kind.has_text() {
            // Missing images are still an error.
            tokio::fs::metadata(path).await?;
            return Ok(ExtractedDocument::without_text(kind));
        }

        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), %kind, bytes = bytes.len(), "Loaded document");

        extract(kind, &bytes, self.pdf.as_deref(), self.line_threshold)
            .map_err(|e| e.into_port_error(kind))
    }
}
