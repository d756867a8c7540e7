//! Events emitted by the playback engine to the application layer.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag so UI layers can switch on it:
//!
//! ```json
//! { "type": "cursor_moved", "session": 4, "index": 17 }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::Granularity;
use crate::ports::SessionId;

/// Playback controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No session exists.
    #[default]
    Idle,

    /// A session is speaking and the cursor follows progress events.
    Playing,

    /// The session is paused; the cursor is frozen.
    Paused,
}

impl PlaybackState {
    /// Lowercase label (`"idle"`, `"playing"`, `"paused"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The cursor exhausted the unit range.
    Completed,
    /// `stop()` was called (directly or by a seek / new document).
    Stopped,
    /// The backend reported a failure.
    Failed,
}

/// Events emitted by the reader engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReaderEvent {
    /// Controller state changed.
    StateChanged { state: PlaybackState },

    /// A new document replaced the previous one.
    DocumentLoaded {
        units: usize,
        granularity: Granularity,
    },

    /// A playback session began.
    SessionStarted {
        session: SessionId,
        #[serde(rename = "startIndex")]
        start_index: usize,
        /// Name of the selected voice, `None` for the platform default.
        voice: Option<String>,
    },

    /// The cursor moved to a new unit.
    CursorMoved { session: SessionId, index: usize },

    /// A playback session ended.
    SessionFinished {
        session: SessionId,
        reason: FinishReason,
    },

    /// Non-fatal error surfaced to the UI.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_event_wire_format() {
        let event = ReaderEvent::CursorMoved {
            session: SessionId(4),
            index: 17,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cursor_moved");
        assert_eq!(json["session"], 4);
        assert_eq!(json["index"], 17);
    }

    #[test]
    fn session_started_uses_camel_case_start_index() {
        let event = ReaderEvent::SessionStarted {
            session: SessionId(1),
            start_index: 3,
            voice: Some("Samantha".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session_started");
        assert_eq!(json["startIndex"], 3);
    }

    #[test]
    fn state_labels() {
        assert_eq!(PlaybackState::default().as_str(), "idle");
        assert_eq!(PlaybackState::Paused.as_str(), "paused");
    }
}
