//! Core domain types and port definitions for speakdoc.
//!
//! This crate has no knowledge of any concrete speech engine, display toolkit
//! or document parser. Adapters implement the traits in [`ports`] and the
//! engine in `speakdoc-voice` consumes them.
//!
//! - [`domain`] - text units, anchors, document kinds, voice descriptors
//! - [`ports`] - speech backend, display surface and document source traits
//! - [`events`] - events emitted by the playback engine
//! - [`settings`] - reader settings with defaults and validation

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AnchorId, DocumentKind, ExtractedDocument, Granularity, PositionedText, TextUnit,
    VoiceDescriptor,
};
pub use events::{FinishReason, PlaybackState, ReaderEvent};
pub use ports::{
    DisplaySurface, DocumentPortError, DocumentSource, PdfTextProvider, ScrollAlign,
    ScrollBehavior, ScrollRequest, SessionId, SpeechBackend, SpeechEvent, SpeechEventSink,
    SpeechNotification, SpeechPortError, Utterance, VoiceInventory,
};
pub use settings::{
    DEFAULT_ABBREVIATIONS, DEFAULT_LOCALE, DEFAULT_PDF_LINE_THRESHOLD, DEFAULT_PITCH,
    DEFAULT_RATE, DEFAULT_VOICE_PREFERENCES, ReaderSettings, SettingsError, SettingsUpdate,
    validate_settings,
};
