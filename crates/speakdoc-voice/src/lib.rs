//! Segmentation and synchronized read-aloud engine.
//!
//! The text pipeline runs leaf-first:
//!
//! ```text
//!   raw text → normalize → segment → UnitRegistry (anchors on the surface)
//!            → PlaybackController → SpeechBackend → progress events
//!            → cursor → HighlightSync
//! ```
//!
//! [`Reader`] ties the pieces together for one document at a time.

#![deny(unused_crate_dependencies)]

// Dev-dependency only used by integration tests
#[cfg(test)]
use mockall as _;

pub mod backend;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod highlight;
pub mod normalize;
pub mod reader;
pub mod registry;
pub mod segment;

pub use backend::PacedBackend;
#[cfg(unix)]
pub use backend::EspeakBackend;
pub use catalog::{CatalogSnapshot, VoiceCatalog, VoiceSelector};
pub use controller::{PlaybackConfig, PlaybackController, PlaybackSession};
pub use error::ReaderError;
pub use highlight::HighlightSync;
pub use normalize::{AbbreviationSet, Normalizer, collapse_whitespace, expand_acronyms};
pub use reader::{Reader, segment_text};
pub use registry::UnitRegistry;
pub use segment::{Segment, Segmenter};
