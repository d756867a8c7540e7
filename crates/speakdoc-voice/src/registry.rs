//! Binds segmented units to display anchors.

use std::collections::HashMap;

use speakdoc_core::{AnchorId, DisplaySurface, Granularity, TextUnit};

use crate::segment::Segment;

/// The units of the current document and their anchors.
///
/// Built once per document load; read-only afterwards. Every anchor the
/// registry created (unit anchors and, in sentence mode, their word spans)
/// resolves back to its unit index in O(1).
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    granularity: Granularity,
    units: Vec<TextUnit>,
    by_anchor: HashMap<AnchorId, usize>,
}

impl UnitRegistry {
    /// A registry with no units.
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    /// Clear `surface` and render one anchor per segment, in order.
    ///
    /// In word mode the anchor holds the unit text. In sentence mode the
    /// anchor is a container and each word becomes a clickable child span.
    pub fn build(
        segments: &[Segment],
        granularity: Granularity,
        surface: &mut dyn DisplaySurface,
    ) -> Self {
        surface.clear();

        let mut units = Vec::with_capacity(segments.len());
        let mut by_anchor = HashMap::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            let anchor = match granularity {
                Granularity::Word => surface.append_anchor(&segment.content),
                Granularity::Sentence => {
                    let container = surface.append_anchor("");
                    for word in &segment.words {
                        let span = surface.append_span(container, &format!("{word} "));
                        by_anchor.insert(span, index);
                    }
                    container
                }
            };
            by_anchor.insert(anchor, index);
            units.push(TextUnit {
                index,
                content: segment.content.clone(),
                anchor,
            });
        }

        tracing::debug!(units = units.len(), %granularity, "Unit registry built");

        Self {
            granularity,
            units,
            by_anchor,
        }
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[TextUnit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&TextUnit> {
        self.units.get(index)
    }

    /// Index of the last unit, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.units.len().checked_sub(1)
    }

    /// Unit index for a unit anchor or one of its word spans.
    pub fn index_of(&self, anchor: AnchorId) -> Option<usize> {
        self.by_anchor.get(&anchor).copied()
    }

    /// Anchor of the unit at `index`.
    pub fn anchor_of(&self, index: usize) -> Option<AnchorId> {
        self.units.get(index).map(|u| u.anchor)
    }
}
