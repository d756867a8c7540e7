//! Port definitions - the traits adapters implement.
//!
//! # Design Rules
//!
//! - Ports carry only domain types; no engine, toolkit or parser types leak in.
//! - The playback engine depends on these traits, never on an adapter.

mod display;
mod document;
mod speech;

pub use display::{DisplaySurface, ScrollAlign, ScrollBehavior, ScrollRequest};
pub use document::{DocumentPortError, DocumentSource, PdfTextProvider};
pub use speech::{
    SessionId, SpeechBackend, SpeechEvent, SpeechEventSink, SpeechNotification, SpeechPortError,
    Utterance, VoiceInventory,
};
