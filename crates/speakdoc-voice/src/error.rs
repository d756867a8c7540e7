//! Reader error types.

use speakdoc_core::{DocumentPortError, SettingsError};

/// Errors surfaced by the [`Reader`](crate::Reader) facade.
///
/// Playback itself never fails synchronously: backend failures end the
/// session and are reported as [`ReaderEvent::Error`](speakdoc_core::ReaderEvent).
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The voice catalog has not signalled readiness yet.
    #[error("Voices are still loading")]
    VoicesNotReady,

    /// Settings failed validation.
    #[error("Invalid reader settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// The document could not be loaded.
    #[error("Failed to load document: {0}")]
    Document(#[from] DocumentPortError),
}
