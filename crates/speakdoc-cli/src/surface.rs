//! Terminal display surface.
//!
//! There is nothing to scroll in a terminal, so each highlight prints the
//! active unit as one line: `[index] text`. Sentence containers are printed
//! with the text of their word spans.

use std::collections::HashMap;
use std::io::{self, Write};

use speakdoc_core::{AnchorId, DisplaySurface, ScrollRequest};

struct AnchorEntry {
    /// Unit index for top-level anchors, `None` for spans.
    unit: Option<usize>,
    text: String,
}

/// [`DisplaySurface`] that writes highlighted units to `out`.
pub struct TerminalSurface<W> {
    out: W,
    anchors: HashMap<AnchorId, AnchorEntry>,
    next_anchor: u64,
    next_unit: usize,
    active: Option<AnchorId>,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            anchors: HashMap::new(),
            next_anchor: 0,
            next_unit: 0,
            active: None,
        }
    }

    pub const fn active(&self) -> Option<AnchorId> {
        self.active
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn allocate(&mut self, unit: Option<usize>, text: &str) -> AnchorId {
        self.next_anchor += 1;
        let id = AnchorId(self.next_anchor);
        self.anchors.insert(
            id,
            AnchorEntry {
                unit,
                text: text.to_string(),
            },
        );
        id
    }

    fn print_active(&mut self, anchor: AnchorId) {
        let Some(entry) = self.anchors.get(&anchor) else {
            tracing::debug!(%anchor, "Highlight for unknown anchor");
            return;
        };
        let line = match entry.unit {
            Some(unit) => format!("[{unit}] {}", entry.text.trim()),
            None => entry.text.trim().to_string(),
        };
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write highlight");
        }
    }
}

impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    fn clear(&mut self) {
        self.anchors.clear();
        self.next_unit = 0;
        self.active = None;
    }

    fn append_anchor(&mut self, content: &str) -> AnchorId {
        let unit = self.next_unit;
        self.next_unit += 1;
        self.allocate(Some(unit), content)
    }

    fn append_span(&mut self, parent: AnchorId, content: &str) -> AnchorId {
        if let Some(entry) = self.anchors.get_mut(&parent) {
            entry.text.push_str(content);
        }
        self.allocate(None, content)
    }

    fn set_active(&mut self, anchor: AnchorId, active: bool) {
        if active {
            self.active = Some(anchor);
            self.print_active(anchor);
        } else if self.active == Some(anchor) {
            self.active = None;
        }
    }

    fn clear_highlights(&mut self) {
        self.active = None;
    }

    fn scroll_into_view(&mut self, anchor: AnchorId, request: ScrollRequest) {
        tracing::trace!(%anchor, ?request, "Scroll request");
    }
}

impl<W> std::fmt::Debug for TerminalSurface<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("anchors", &self.anchors.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn prints_highlighted_word() {
        let mut surface = TerminalSurface::new(Vec::new());
        let _first = surface.append_anchor("Hello ");
        let second = surface.append_anchor("world");

        surface.set_active(second, true);
        surface.scroll_into_view(second, ScrollRequest::CENTERED);

        assert_eq!(surface.active(), Some(second));
        assert_eq!(output(surface), "[1] world\n");
    }

    #[test]
    fn sentence_container_shows_span_text() {
        let mut surface = TerminalSurface::new(Vec::new());
        let sentence = surface.append_anchor("");
        surface.append_span(sentence, "Hi ");
        surface.append_span(sentence, "there. ");

        surface.set_active(sentence, true);

        assert_eq!(output(surface), "[0] Hi there.\n");
    }

    #[test]
    fn clear_restarts_numbering() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.append_anchor("old ");
        surface.clear();
        let fresh = surface.append_anchor("new");

        surface.set_active(fresh, true);
        surface.clear_highlights();

        assert_eq!(surface.active(), None);
        assert_eq!(output(surface), "[0] new\n");
    }

    #[test]
    fn deactivating_other_anchor_keeps_active() {
        let mut surface = TerminalSurface::new(Vec::new());
        let a = surface.append_anchor("a ");
        let b = surface.append_anchor("b");
        surface.set_active(b, true);
        surface.set_active(a, false);
        assert_eq!(surface.active(), Some(b));
    }
}
