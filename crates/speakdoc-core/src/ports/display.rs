//! Display surface port - where unit anchors are rendered and highlighted.

use crate::domain::AnchorId;

/// How a scroll request should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Where in the viewport the anchor should end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// A request to bring an anchor into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollRequest {
    pub behavior: ScrollBehavior,
    pub align: ScrollAlign,
}

impl ScrollRequest {
    /// Smooth motion, anchor centered in the viewport.
    pub const CENTERED: Self = Self {
        behavior: ScrollBehavior::Smooth,
        align: ScrollAlign::Center,
    };
}

/// A scrollable container of clickable anchors.
///
/// The engine appends one anchor per unit (and, for sentence units, one
/// clickable span per word) and toggles a single "active" state per anchor.
/// Click delivery is the adapter's job: it reports the clicked [`AnchorId`]
/// back to the engine.
pub trait DisplaySurface: Send {
    /// Remove every anchor from the container.
    fn clear(&mut self);

    /// Append a top-level anchor holding `content`.
    fn append_anchor(&mut self, content: &str) -> AnchorId;

    /// Append a clickable span inside `parent`.
    fn append_span(&mut self, parent: AnchorId, content: &str) -> AnchorId;

    /// Set or clear the active (highlighted) state of an anchor.
    fn set_active(&mut self, anchor: AnchorId, active: bool);

    /// Clear the active state of every anchor.
    fn clear_highlights(&mut self);

    /// Bring an anchor into the viewport.
    fn scroll_into_view(&mut self, anchor: AnchorId, request: ScrollRequest);
}
