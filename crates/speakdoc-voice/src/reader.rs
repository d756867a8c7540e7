//! Reader facade - one document session at a time.
//!
//! Wraps the text pipeline (normalize → segment → register) and the
//! [`PlaybackController`]. Loading a new document replaces everything from
//! the previous one; activating an anchor seeks to its unit.

use std::path::Path;
use std::sync::Arc;

use speakdoc_core::{
    AnchorId, DisplaySurface, DocumentSource, ExtractedDocument, Granularity, ReaderEvent,
    ReaderSettings, SpeechBackend, validate_settings,
};
use tokio::sync::mpsc;

use crate::catalog::VoiceCatalog;
use crate::controller::{PlaybackConfig, PlaybackController};
use crate::error::ReaderError;
use crate::normalize::Normalizer;
use crate::registry::UnitRegistry;
use crate::segment::{Segment, Segmenter};

/// Normalize and segment raw document text.
pub fn segment_text(raw: &str, granularity: Granularity, normalizer: &Normalizer) -> Vec<Segment> {
    let normalized = normalizer.normalize(raw, granularity);
    Segmenter::new(granularity, normalizer.abbreviations().clone()).segment(&normalized)
}

/// Document reading session.
#[derive(Debug)]
pub struct Reader {
    controller: PlaybackController,
    catalog: VoiceCatalog,
    normalizer: Normalizer,
    granularity: Granularity,
    /// Raw text of the current document, kept for re-segmentation.
    text: Option<String>,
}

impl Reader {
    /// Create a reader with no document loaded.
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        catalog: VoiceCatalog,
        surface: Box<dyn DisplaySurface>,
        settings: &ReaderSettings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ReaderEvent>), ReaderError> {
        validate_settings(settings)?;

        let config = PlaybackConfig::from_settings(settings);
        let normalizer = config.normalizer.clone();
        let (controller, events) =
            PlaybackController::new(backend, catalog.clone(), surface, config);

        let reader = Self {
            controller,
            catalog,
            normalizer,
            granularity: settings.effective_granularity(),
            text: None,
        };
        Ok((reader, events))
    }

    pub const fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub const fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub const fn registry(&self) -> &Arc<UnitRegistry> {
        self.controller.registry()
    }

    pub const fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    // ── Loading ────────────────────────────────────────────────────

    /// Replace the current document with `raw` text. Returns the unit count.
    pub fn load_text(&mut self, raw: &str) -> usize {
        let segments = segment_text(raw, self.granularity, &self.normalizer);
        self.text = Some(raw.to_string());
        self.controller
            .load_document(&segments, self.granularity)
            .len()
    }

    /// Replace the current document with an extracted one.
    ///
    /// Documents without readable text produce no units.
    pub fn load_document(&mut self, document: &ExtractedDocument) -> usize {
        if let Some(text) = document.readable_text() {
            self.load_text(text)
        } else {
            tracing::info!(kind = %document.kind, "Document has no readable text");
            self.load_text("")
        }
    }

    /// Load the document at `path` through `source`.
    ///
    /// On failure the previous document is still discarded, leaving an
    /// empty reader.
    pub async fn open(
        &mut self,
        source: &dyn DocumentSource,
        path: &Path,
    ) -> Result<usize, ReaderError> {
        self.controller.stop();
        match source.load(path).await {
            Ok(document) => Ok(self.load_document(&document)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load document");
                self.load_text("");
                Err(e.into())
            }
        }
    }

    /// Switch granularity, re-segmenting the current document.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        if self.granularity == granularity {
            return;
        }
        tracing::info!(old = %self.granularity, new = %granularity, "Granularity changed");
        self.granularity = granularity;
        if let Some(text) = self.text.take() {
            self.load_text(&text);
        }
    }

    /// Apply new settings. Future sessions use the new speech parameters;
    /// a granularity change re-segments the current document.
    pub fn apply_settings(&mut self, settings: &ReaderSettings) -> Result<(), ReaderError> {
        validate_settings(settings)?;
        let config = PlaybackConfig::from_settings(settings);
        self.normalizer = config.normalizer.clone();
        self.controller.set_config(config);
        self.set_granularity(settings.effective_granularity());
        Ok(())
    }

    // ── Transport ──────────────────────────────────────────────────

    /// The "read" trigger: start from the first unit.
    ///
    /// Refused until the voice catalog has signalled readiness.
    pub fn read_from_start(&mut self) -> Result<(), ReaderError> {
        if !self.catalog.is_ready() {
            return Err(ReaderError::VoicesNotReady);
        }
        self.controller.start(0);
        Ok(())
    }

    /// Handle a click on `anchor`: seek to its unit.
    ///
    /// Returns `false` for anchors that do not belong to the current document.
    pub fn activate(&mut self, anchor: AnchorId) -> bool {
        let Some(index) = self.controller.registry().index_of(anchor) else {
            tracing::debug!(%anchor, "Ignoring activation of unknown anchor");
            return false;
        };
        self.controller.seek(index);
        true
    }

    pub fn seek(&mut self, index: usize) {
        self.controller.seek(index);
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn resume(&mut self) {
        self.controller.resume();
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    /// Wait for one speech notification and apply it.
    pub async fn process_next_speech_event(&mut self) {
        if let Some(notification) = self.controller.recv_speech_event().await {
            self.controller.handle_speech_event(notification);
        }
    }
}
