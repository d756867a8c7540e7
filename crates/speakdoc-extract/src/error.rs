use speakdoc_core::{DocumentKind, DocumentPortError};
use thiserror::Error;

/// Errors produced while extracting text from a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// PDF text can only be obtained through a PDF collaborator.
    #[error("PDF extraction needs a PDF text provider")]
    NeedsPdfCollaborator,

    /// The bytes are not a readable zip archive.
    #[error("Invalid DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive has no main document part.
    #[error("DOCX archive has no word/document.xml")]
    MissingDocumentPart,

    /// The PDF collaborator failed.
    #[error("PDF provider failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Convert into the port-level error for a document of `kind`.
    pub fn into_port_error(self, kind: DocumentKind) -> DocumentPortError {
        match self {
            Self::NeedsPdfCollaborator => DocumentPortError::NoPdfProvider,
            Self::Io(e) => DocumentPortError::Io(e),
            other => DocumentPortError::Extraction {
                kind,
                reason: other.to_string(),
            },
        }
    }
}
