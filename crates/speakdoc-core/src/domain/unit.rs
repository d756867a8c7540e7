//! Addressable text units and the display anchors they are bound to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to a displayable element created by a
/// [`DisplaySurface`](crate::ports::DisplaySurface).
///
/// Anchors are allocated by the surface; the engine only compares and hashes
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

/// One addressable, speakable piece of the document.
///
/// Units are produced in reading order and `index` always equals the unit's
/// position in its sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Zero-based position in the unit sequence.
    pub index: usize,

    /// Text of the unit. In word mode this includes the single trailing
    /// space that followed the word in the normalized text.
    pub content: String,

    /// Display element representing this unit.
    pub anchor: AnchorId,
}

/// Granularity of segmentation and playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One unit per word; the whole remainder is spoken as a single
    /// utterance and the cursor follows word boundary events.
    #[default]
    Word,

    /// One unit per sentence; each sentence is spoken as its own utterance.
    Sentence,
}

impl Granularity {
    /// Stable lowercase label (`"word"` / `"sentence"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Sentence => "sentence",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
