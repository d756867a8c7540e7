//! Document text extraction for speakdoc.
//!
//! Turns a file on disk into an [`ExtractedDocument`](speakdoc_core::ExtractedDocument):
//!
//! - plain text is decoded verbatim,
//! - DOCX bodies are read from `word/document.xml`,
//! - PDF pages come from a [`PdfTextProvider`](speakdoc_core::PdfTextProvider)
//!   and are stitched back into lines by [`reconstruct_page_text`],
//! - images carry no text.

#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

mod docx;
mod error;
mod extractor;
mod pdf;
mod source;
mod text;

pub use docx::extract_docx_text;
pub use error::ExtractError;
pub use extractor::extract;
pub use pdf::{join_pages, reconstruct_page_text};
pub use source::FileDocumentSource;
pub use text::decode_text;
