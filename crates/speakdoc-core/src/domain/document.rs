//! Supported document kinds and the text handed to the engine.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "tif", "tiff"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The closed set of document kinds speakdoc can display.
///
/// Resolved once at load time by [`DocumentKind::detect`]; everything
/// downstream matches exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Paged document; text comes from a PDF collaborator.
    Pdf,
    /// Plain text, decoded verbatim.
    PlainText,
    /// Word-processor document (`.docx`), raw text only.
    WordDoc,
    /// Image; displayable but has no extractable text.
    Image,
}

impl DocumentKind {
    /// Resolve the kind of a file from its name and (optional) MIME type.
    ///
    /// MIME types win over extensions when both are known. Returns `None`
    /// for unsupported files.
    #[must_use]
    pub fn detect(file_name: &str, mime: Option<&str>) -> Option<Self> {
        if let Some(mime) = mime.map(str::trim).filter(|m| !m.is_empty()) {
            let mime = mime.to_ascii_lowercase();
            if mime == "application/pdf" {
                return Some(Self::Pdf);
            }
            if mime.starts_with("image/") {
                return Some(Self::Image);
            }
            if mime == DOCX_MIME {
                return Some(Self::WordDoc);
            }
            if mime.starts_with("text/") {
                return Some(Self::PlainText);
            }
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)?;

        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::WordDoc),
            ext if TEXT_EXTENSIONS.contains(&ext) => Some(Self::PlainText),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Some(Self::Image),
            _ => None,
        }
    }

    /// Whether documents of this kind can yield text to read aloud.
    #[must_use]
    pub const fn has_text(self) -> bool {
        match self {
            Self::Pdf | Self::PlainText | Self::WordDoc => true,
            Self::Image => false,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pdf => "pdf",
            Self::PlainText => "text",
            Self::WordDoc => "docx",
            Self::Image => "image",
        };
        f.write_str(label)
    }
}

/// Output of a document extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Kind the document was resolved to.
    pub kind: DocumentKind,

    /// Raw extracted text. `None` for documents without text (images).
    pub text: Option<String>,
}

impl ExtractedDocument {
    /// A document that has display content but nothing to read.
    #[must_use]
    pub const fn without_text(kind: DocumentKind) -> Self {
        Self { kind, text: None }
    }

    /// Text to segment, or `None` when there is nothing readable.
    #[must_use]
    pub fn readable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// A text item placed on a PDF page.
///
/// `y` is the item's vertical position in page units; only differences
/// between consecutive items matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedText {
    pub text: String,
    pub y: f32,
}

impl PositionedText {
    pub fn new(text: impl Into<String>, y: f32) -> Self {
        Self {
            text: text.into(),
            y,
        }
    }
}
