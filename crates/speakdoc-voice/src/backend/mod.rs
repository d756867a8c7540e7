//! Speech backend implementations.
//!
//! | Backend           | Platform | Boundaries | Audio |
//! |-------------------|----------|------------|-------|
//! | [`PacedBackend`]  | any      | per word   | none  |
//! | [`EspeakBackend`] | unix     | none       | yes   |
//!
//! Both implement [`SpeechBackend`](speakdoc_core::SpeechBackend) and
//! [`VoiceInventory`](speakdoc_core::VoiceInventory).

#[cfg(unix)]
mod espeak;
mod paced;

#[cfg(unix)]
pub use espeak::EspeakBackend;
pub use paced::PacedBackend;
