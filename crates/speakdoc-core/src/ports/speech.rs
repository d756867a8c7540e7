//! Speech backend port - the process-wide synthesizer the engine drives.
//!
//! A backend accepts one [`Utterance`] at a time and reports progress through
//! the [`SpeechEventSink`] handed to it with the request. Every event is
//! stamped with the [`SessionId`] of the session that issued the request, so
//! the engine can discard notifications that arrive after the session was
//! cancelled or superseded.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::VoiceDescriptor;

/// Identifier of one playback session (one continuous reading attempt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A request to speak a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak (already transformed for speech).
    pub text: String,

    /// Voice to use; `None` lets the backend pick its platform default.
    pub voice: Option<VoiceDescriptor>,

    /// Speaking rate multiplier (1.0 = normal).
    pub rate: f32,

    /// Pitch multiplier (1.0 = normal).
    pub pitch: f32,
}

/// Progress notification emitted by a backend for the current utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Audio output for the utterance began.
    Started,

    /// Speech progressed past a word boundary.
    ///
    /// `char_index` is the byte offset of the word being started within the
    /// utterance text, when the backend knows it.
    Boundary { char_index: Option<usize> },

    /// The utterance finished playing (not emitted after `cancel`).
    Ended,

    /// The backend gave up on the utterance.
    Failed(String),
}

/// A [`SpeechEvent`] tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechNotification {
    pub session: SessionId,
    pub event: SpeechEvent,
}

/// Session-stamped sender handed to a backend with each utterance.
#[derive(Debug, Clone)]
pub struct SpeechEventSink {
    session: SessionId,
    tx: mpsc::UnboundedSender<SpeechNotification>,
}

impl SpeechEventSink {
    /// Create a sink that stamps every event with `session`.
    pub const fn new(session: SessionId, tx: mpsc::UnboundedSender<SpeechNotification>) -> Self {
        Self { session, tx }
    }

    /// Session this sink reports for.
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Send an event. Returns `false` if the engine is gone.
    pub fn emit(&self, event: SpeechEvent) -> bool {
        let delivered = self
            .tx
            .send(SpeechNotification {
                session: self.session,
                event,
            })
            .is_ok();
        if !delivered {
            tracing::trace!(session = %self.session, "Speech event receiver dropped");
        }
        delivered
    }

    pub fn started(&self) -> bool {
        self.emit(SpeechEvent::Started)
    }

    pub fn boundary(&self, char_index: Option<usize>) -> bool {
        self.emit(SpeechEvent::Boundary { char_index })
    }

    pub fn ended(&self) -> bool {
        self.emit(SpeechEvent::Ended)
    }

    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.emit(SpeechEvent::Failed(reason.into()))
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Errors returned synchronously by a [`SpeechBackend`].
#[derive(Debug, Error)]
pub enum SpeechPortError {
    /// The synthesizer is not installed or could not be reached.
    #[error("Speech backend unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the utterance (bad voice, bad parameters).
    #[error("Utterance rejected: {0}")]
    Rejected(String),

    /// IO error while talking to the synthesizer.
    #[error("Speech backend IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend-agnostic speech synthesizer.
///
/// The synthesizer is a single shared resource: at most one utterance is
/// active. Callers guarantee this by calling [`cancel`](Self::cancel) before
/// every [`speak`](Self::speak).
///
/// Implementations must be `Send + Sync`; all methods take `&self` and use
/// interior mutability, so the trait stays object-safe.
pub trait SpeechBackend: Send + Sync {
    /// Queue `utterance` and report its progress through `events`.
    ///
    /// Must not block until speech completes.
    fn speak(&self, utterance: Utterance, events: SpeechEventSink) -> Result<(), SpeechPortError>;

    /// Pause the current utterance. No-op when nothing is playing.
    fn pause(&self);

    /// Resume a paused utterance. No-op when nothing is paused.
    fn resume(&self);

    /// Cancel the current and all pending utterances. Always safe to call.
    fn cancel(&self);

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Enumerates the voices a synthesizer offers.
///
/// Enumeration may be slow (it can spawn a process or wait for a platform
/// service), so it is async and run off the playback path.
#[async_trait]
pub trait VoiceInventory: Send + Sync {
    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechPortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sink_stamps_session_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = SpeechEventSink::new(SessionId(3), tx);

        assert!(sink.started());
        assert!(sink.boundary(Some(4)));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.session, SessionId(3));
        assert_eq!(first.event, SpeechEvent::Started);

        let second = rx.recv().await.unwrap();
        assert_eq!(
            second.event,
            SpeechEvent::Boundary {
                char_index: Some(4)
            }
        );
    }

    #[test]
    fn sink_reports_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = SpeechEventSink::new(SessionId(1), tx);
        drop(rx);

        assert!(sink.is_closed());
        assert!(!sink.ended());
    }
}
