//! Domain types shared by every speakdoc crate.

mod document;
mod unit;
mod voice;

pub use document::{DocumentKind, ExtractedDocument, PositionedText};
pub use unit::{AnchorId, Granularity, TextUnit};
pub use voice::VoiceDescriptor;
