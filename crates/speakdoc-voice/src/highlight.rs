//! Keeps exactly one anchor highlighted and scrolled into view.

use speakdoc_core::{AnchorId, DisplaySurface, ScrollRequest};

/// Owns the display surface and its single active anchor.
pub struct HighlightSync {
    surface: Box<dyn DisplaySurface>,
    active: Option<AnchorId>,
    scroll: ScrollRequest,
}

impl HighlightSync {
    pub fn new(surface: Box<dyn DisplaySurface>) -> Self {
        Self {
            surface,
            active: None,
            scroll: ScrollRequest::CENTERED,
        }
    }

    /// Currently highlighted anchor.
    pub const fn active(&self) -> Option<AnchorId> {
        self.active
    }

    /// Move the highlight to `anchor` and bring it into view.
    pub fn move_to(&mut self, anchor: AnchorId) {
        if let Some(previous) = self.active.take() {
            if previous != anchor {
                self.surface.set_active(previous, false);
            }
        }
        self.surface.set_active(anchor, true);
        self.surface.scroll_into_view(anchor, self.scroll);
        self.active = Some(anchor);
    }

    /// Remove every highlight.
    pub fn clear(&mut self) {
        self.surface.clear_highlights();
        self.active = None;
    }

    /// Surface access for rendering a new document.
    ///
    /// The tracked highlight is forgotten since rendering replaces anchors.
    pub fn surface_for_render(&mut self) -> &mut dyn DisplaySurface {
        self.active = None;
        self.surface.as_mut()
    }
}

impl std::fmt::Debug for HighlightSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightSync")
            .field("active", &self.active)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl DisplaySurface for Log {
        fn clear(&mut self) {
            self.0.lock().unwrap().push("clear".into());
        }
        fn append_anchor(&mut self, _content: &str) -> AnchorId {
            AnchorId(0)
        }
        fn append_span(&mut self, _parent: AnchorId, _content: &str) -> AnchorId {
            AnchorId(0)
        }
        fn set_active(&mut self, anchor: AnchorId, active: bool) {
            self.0.lock().unwrap().push(format!("{}={active}", anchor.0));
        }
        fn clear_highlights(&mut self) {
            self.0.lock().unwrap().push("clear_highlights".into());
        }
        fn scroll_into_view(&mut self, anchor: AnchorId, request: ScrollRequest) {
            assert_eq!(request, ScrollRequest::CENTERED);
            self.0.lock().unwrap().push(format!("scroll {}", anchor.0));
        }
    }

    #[test]
    fn moving_clears_previous_anchor() {
        let log = Log::default();
        let mut sync = HighlightSync::new(Box::new(log.clone()));

        sync.move_to(AnchorId(1));
        sync.move_to(AnchorId(2));

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["1=true", "scroll 1", "1=false", "2=true", "scroll 2"]
        );
        assert_eq!(sync.active(), Some(AnchorId(2)));
    }

    #[test]
    fn clear_removes_all() {
        let log = Log::default();
        let mut sync = HighlightSync::new(Box::new(log.clone()));
        sync.move_to(AnchorId(1));
        sync.clear();

        assert_eq!(sync.active(), None);
        assert_eq!(log.0.lock().unwrap().last().map(String::as_str), Some("clear_highlights"));
    }
}
