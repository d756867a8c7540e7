//! Document extraction ports.
//!
//! Extraction is I/O glue: a [`DocumentSource`] turns a file into an
//! [`ExtractedDocument`]. PDF parsing is delegated further to a
//! [`PdfTextProvider`] so that the engine never depends on a PDF library.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DocumentKind, ExtractedDocument, PositionedText};

/// Errors returned by document ports.
#[derive(Debug, Error)]
pub enum DocumentPortError {
    /// The file type is not one of the supported kinds.
    #[error("Unsupported document: {0}")]
    Unsupported(String),

    /// The document is of a supported kind but could not be decoded.
    #[error("Failed to extract {kind} document: {reason}")]
    Extraction { kind: DocumentKind, reason: String },

    /// A PDF was loaded but no PDF collaborator is configured.
    #[error("No PDF text provider configured")]
    NoPdfProvider,

    /// IO error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads a document from disk and extracts its text.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load and extract the document at `path`.
    async fn load(&self, path: &Path) -> Result<ExtractedDocument, DocumentPortError>;
}

/// External PDF collaborator: yields the positioned text items of each page.
pub trait PdfTextProvider: Send + Sync {
    /// Text items of every page, in page order.
    fn page_items(&self, bytes: &[u8]) -> Result<Vec<Vec<PositionedText>>, DocumentPortError>;
}
