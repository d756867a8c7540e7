//! Playback controller - drives a speech backend from a unit index and keeps
//! the highlighted unit in step with speech progress.
//!
//! ```text
//!            start(i)             pause()
//!   Idle ───────────────▶ Playing ───────▶ Paused
//!    ▲                     │   ▲             │
//!    │  stop() / end /     │   └─ resume() ──┘
//!    └──── failure ────────┘
//! ```
//!
//! At most one [`PlaybackSession`] exists. Every speech request is tagged
//! with the session's [`SessionId`]; notifications carrying any other id are
//! dropped, so a cancelled utterance can never move the cursor of its
//! successor.
//!
//! - **Word mode** speaks the whole remainder (`start_index..N`) as one
//!   utterance. Boundary events move the cursor forward one unit, or to the
//!   unit containing the reported offset. The end event completes the
//!   session.
//! - **Sentence mode** speaks one unit per utterance and advances on each
//!   end event until the range is exhausted.

use std::sync::Arc;

use speakdoc_core::{
    AnchorId, DisplaySurface, FinishReason, Granularity, PlaybackState, ReaderEvent,
    ReaderSettings, SessionId, SpeechBackend, SpeechEvent, SpeechEventSink, SpeechNotification,
    Utterance, VoiceDescriptor,
};
use tokio::sync::mpsc;

use crate::catalog::{VoiceCatalog, VoiceSelector};
use crate::highlight::HighlightSync;
use crate::normalize::Normalizer;
use crate::registry::UnitRegistry;
use crate::segment::Segment;

// ── Configuration ──────────────────────────────────────────────────

/// Speech parameters applied to every new session.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub rate: f32,
    pub pitch: f32,
    pub selector: VoiceSelector,
    /// Produces the spoken form of unit content.
    pub normalizer: Normalizer,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::from_settings(&ReaderSettings::default())
    }
}

impl PlaybackConfig {
    pub fn from_settings(settings: &ReaderSettings) -> Self {
        Self {
            rate: settings.effective_rate(),
            pitch: settings.effective_pitch(),
            selector: VoiceSelector::from_settings(settings),
            normalizer: Normalizer::from_settings(settings),
        }
    }
}

// ── Session ────────────────────────────────────────────────────────

/// One continuous reading attempt.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    id: SessionId,
    start_index: usize,
    cursor_index: usize,
    voice: Option<VoiceDescriptor>,
    rate: f32,
    pitch: f32,
    /// Byte offset of each unit (from `start_index`) in the word-mode utterance.
    unit_offsets: Vec<usize>,
    /// Whether the cursor has been highlighted yet.
    highlighted: bool,
    /// Boundaries received while paused, applied in order on resume.
    deferred_boundaries: Vec<Option<usize>>,
    /// A sentence ended while paused; the next one is spoken on resume.
    pending_advance: bool,
}

impl PlaybackSession {
    pub const fn id(&self) -> SessionId {
        self.id
    }

    pub const fn start_index(&self) -> usize {
        self.start_index
    }

    pub const fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub const fn voice(&self) -> Option<&VoiceDescriptor> {
        self.voice.as_ref()
    }

    pub const fn rate(&self) -> f32 {
        self.rate
    }

    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit index whose spoken text contains byte `offset`.
    fn unit_at_offset(&self, offset: usize) -> usize {
        let position = self
            .unit_offsets
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        self.start_index + position
    }
}

// ── Controller ─────────────────────────────────────────────────────

/// Single-owner playback state machine.
///
/// All methods take `&mut self`. Speech progress arrives on an internal
/// channel; callers await [`recv_speech_event`](Self::recv_speech_event) and
/// feed the result to [`handle_speech_event`](Self::handle_speech_event),
/// typically inside a `select!` alongside user input.
pub struct PlaybackController {
    state: PlaybackState,
    backend: Arc<dyn SpeechBackend>,
    catalog: VoiceCatalog,
    registry: Arc<UnitRegistry>,
    highlight: HighlightSync,
    session: Option<PlaybackSession>,
    /// Cursor reported while no session exists.
    idle_cursor: Option<usize>,
    next_session: u64,
    config: PlaybackConfig,
    speech_tx: mpsc::UnboundedSender<SpeechNotification>,
    speech_rx: mpsc::UnboundedReceiver<SpeechNotification>,
    event_tx: mpsc::UnboundedSender<ReaderEvent>,
}

impl PlaybackController {
    /// Create a controller with no document loaded.
    ///
    /// Returns the controller and a receiver for [`ReaderEvent`]s.
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        catalog: VoiceCatalog,
        surface: Box<dyn DisplaySurface>,
        config: PlaybackConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ReaderEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();

        let controller = Self {
            state: PlaybackState::Idle,
            backend,
            catalog,
            registry: Arc::new(UnitRegistry::default()),
            highlight: HighlightSync::new(surface),
            session: None,
            idle_cursor: None,
            next_session: 1,
            config,
            speech_tx,
            speech_rx,
            event_tx,
        };

        (controller, event_rx)
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    pub const fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Current cursor: the session's cursor while one exists, otherwise the
    /// start index of the last session (`None` before any session).
    pub fn cursor(&self) -> Option<usize> {
        self.session
            .as_ref()
            .map_or(self.idle_cursor, |s| Some(s.cursor_index))
    }

    pub const fn registry(&self) -> &Arc<UnitRegistry> {
        &self.registry
    }

    pub const fn active_anchor(&self) -> Option<AnchorId> {
        self.highlight.active()
    }

    pub const fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Replace the speech parameters used by future sessions.
    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    // ── Document ───────────────────────────────────────────────────

    /// Replace the current document with `segments`.
    ///
    /// Stops any session, clears the surface and renders the new units.
    pub fn load_document(
        &mut self,
        segments: &[Segment],
        granularity: Granularity,
    ) -> Arc<UnitRegistry> {
        self.stop();
        let registry = Arc::new(UnitRegistry::build(
            segments,
            granularity,
            self.highlight.surface_for_render(),
        ));
        self.registry = Arc::clone(&registry);
        self.idle_cursor = None;

        tracing::info!(units = registry.len(), %granularity, "Document loaded");
        self.emit(ReaderEvent::DocumentLoaded {
            units: registry.len(),
            granularity,
        });
        registry
    }

    // ── Transport ──────────────────────────────────────────────────

    /// Start reading at `index`.
    ///
    /// Any existing session is stopped first. Out-of-range indices are
    /// clamped to the last unit; with no units this is a no-op.
    pub fn start(&mut self, index: usize) {
        self.stop();

        let Some(last) = self.registry.last_index() else {
            tracing::debug!("No units loaded; start ignored");
            return;
        };
        let start_index = index.min(last);
        let granularity = self.registry.granularity();

        let voice = self.config.selector.select(&self.catalog.voices());
        let id = SessionId(self.next_session);
        self.next_session += 1;

        let (text, unit_offsets) = match granularity {
            Granularity::Word => self.word_utterance(start_index),
            Granularity::Sentence => (self.unit_speech(start_index), Vec::new()),
        };

        self.session = Some(PlaybackSession {
            id,
            start_index,
            cursor_index: start_index,
            voice: voice.clone(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            unit_offsets,
            highlighted: false,
            deferred_boundaries: Vec::new(),
            pending_advance: false,
        });

        tracing::info!(
            session = %id,
            start_index,
            %granularity,
            voice = ?voice.as_ref().map(|v| v.name.as_str()),
            "Playback session started"
        );
        self.set_state(PlaybackState::Playing);
        self.emit(ReaderEvent::SessionStarted {
            session: id,
            start_index,
            voice: voice.map(|v| v.name),
        });

        if granularity == Granularity::Sentence {
            self.highlight_cursor();
        }
        self.speak(text);
    }

    /// Pause the active session. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            tracing::debug!(state = ?self.state, "pause ignored");
            return;
        }
        self.backend.pause();
        self.set_state(PlaybackState::Paused);
    }

    /// Resume a paused session. No-op unless paused.
    ///
    /// Progress that arrived while paused is applied before speech
    /// continues: deferred boundaries move the cursor, and a sentence that
    /// ended during the pause advances to the next one.
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            tracing::debug!(state = ?self.state, "resume ignored");
            return;
        }
        self.backend.resume();
        self.set_state(PlaybackState::Playing);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let deferred = std::mem::take(&mut session.deferred_boundaries);
        let pending_advance = std::mem::take(&mut session.pending_advance);
        if !deferred.is_empty() {
            tracing::debug!(count = deferred.len(), "Applying boundaries deferred by pause");
        }
        for char_index in deferred {
            self.on_boundary(char_index);
        }
        if pending_advance {
            self.advance_sentence();
        }
    }

    /// Cancel speech and destroy the session. Idempotent.
    ///
    /// The reported cursor resets to the session's start index and all
    /// highlights are cleared.
    pub fn stop(&mut self) {
        self.end_session(FinishReason::Stopped);
    }

    /// Stop, then start at `index`.
    pub fn seek(&mut self, index: usize) {
        tracing::debug!(index, "Seeking");
        self.stop();
        self.start(index);
    }

    // ── Speech events ──────────────────────────────────────────────

    /// Wait for the next speech notification.
    ///
    /// Never returns `None` while the controller is alive, since it keeps a
    /// sender for its own channel.
    pub async fn recv_speech_event(&mut self) -> Option<SpeechNotification> {
        self.speech_rx.recv().await
    }

    /// Handle every notification already queued. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(notification) = self.speech_rx.try_recv() {
            self.handle_speech_event(notification);
            handled += 1;
        }
        handled
    }

    /// Apply one speech notification to the state machine.
    pub fn handle_speech_event(&mut self, notification: SpeechNotification) {
        let Some(session) = self.session.as_ref() else {
            tracing::trace!(session = %notification.session, "Dropping event with no active session");
            return;
        };
        if notification.session != session.id {
            tracing::trace!(
                stale = %notification.session,
                current = %session.id,
                "Dropping stale speech event"
            );
            return;
        }

        match notification.event {
            SpeechEvent::Started => {
                tracing::debug!(session = %session.id, "Speech started");
            }
            SpeechEvent::Boundary { char_index } => {
                if self.registry.granularity() == Granularity::Word {
                    self.on_boundary(char_index);
                }
            }
            SpeechEvent::Ended => match self.registry.granularity() {
                Granularity::Word => self.end_session(FinishReason::Completed),
                Granularity::Sentence => self.advance_sentence(),
            },
            SpeechEvent::Failed(reason) => {
                tracing::warn!(session = %session.id, %reason, "Speech backend failed");
                self.emit(ReaderEvent::Error { message: reason });
                self.end_session(FinishReason::Failed);
            }
        }
    }

    fn on_boundary(&mut self, char_index: Option<usize>) {
        let Some(last) = self.registry.last_index() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if self.state == PlaybackState::Paused {
            session.deferred_boundaries.push(char_index);
            return;
        }

        let target = match char_index {
            Some(offset) => session.unit_at_offset(offset),
            None if !session.highlighted => session.cursor_index,
            None => session.cursor_index + 1,
        };
        let target = target.clamp(session.cursor_index, last);

        if session.highlighted && target == session.cursor_index {
            return;
        }
        session.cursor_index = target;
        self.highlight_cursor();
    }

    fn advance_sentence(&mut self) {
        let Some(last) = self.registry.last_index() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if self.state == PlaybackState::Paused {
            tracing::debug!(session = %session.id, "Sentence ended while paused; advancing on resume");
            session.pending_advance = true;
            return;
        }
        if session.cursor_index >= last {
            self.end_session(FinishReason::Completed);
            return;
        }

        session.cursor_index += 1;
        let next = session.cursor_index;
        self.highlight_cursor();
        let text = self.unit_speech(next);
        self.speak(text);
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Spoken text for the remainder and each unit's offset within it.
    fn word_utterance(&self, start_index: usize) -> (String, Vec<usize>) {
        let mut text = String::new();
        let mut offsets = Vec::new();
        for unit in &self.registry.units()[start_index..] {
            offsets.push(text.len());
            text.push_str(&self.config.normalizer.speech_text(&unit.content));
        }
        (text, offsets)
    }

    fn unit_speech(&self, index: usize) -> String {
        self.registry
            .unit(index)
            .map(|u| self.config.normalizer.speech_text(&u.content).into_owned())
            .unwrap_or_default()
    }

    fn speak(&mut self, text: String) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let utterance = Utterance {
            text,
            voice: session.voice.clone(),
            rate: session.rate,
            pitch: session.pitch,
        };
        let sink = SpeechEventSink::new(session.id, self.speech_tx.clone());

        tracing::debug!(
            session = %session.id,
            backend = self.backend.name(),
            chars = utterance.text.len(),
            "Speaking utterance"
        );
        if let Err(e) = self.backend.speak(utterance, sink) {
            tracing::warn!(error = %e, "Speech request failed");
            self.emit(ReaderEvent::Error {
                message: e.to_string(),
            });
            self.end_session(FinishReason::Failed);
        }
    }

    fn highlight_cursor(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.highlighted = true;
        let (id, index) = (session.id, session.cursor_index);

        if let Some(anchor) = self.registry.anchor_of(index) {
            self.highlight.move_to(anchor);
        }
        self.emit(ReaderEvent::CursorMoved { session: id, index });
    }

    fn end_session(&mut self, reason: FinishReason) {
        if reason != FinishReason::Completed {
            self.backend.cancel();
        }

        if let Some(session) = self.session.take() {
            self.idle_cursor = Some(session.start_index);
            tracing::info!(session = %session.id, ?reason, "Playback session finished");
            self.emit(ReaderEvent::SessionFinished {
                session: session.id,
                reason,
            });
        }

        self.highlight.clear();
        self.set_state(PlaybackState::Idle);
    }

    fn set_state(&mut self, new_state: PlaybackState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Playback state transition");
            self.state = new_state;
            self.emit(ReaderEvent::StateChanged { state: new_state });
        }
    }

    fn emit(&self, event: ReaderEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Reader event receiver dropped");
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.backend.cancel();
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("backend", &self.backend.name())
            .field("units", &self.registry.len())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use speakdoc_core::{ScrollRequest, SpeechPortError};

    use super::*;
    use crate::normalize::AbbreviationSet;
    use crate::segment::Segmenter;

    struct NullBackend;

    impl SpeechBackend for NullBackend {
        fn speak(&self, _utterance: Utterance, _events: SpeechEventSink) -> Result<(), SpeechPortError> {
            Ok(())
        }
        fn pause(&self) {}
        fn resume(&self) {}
        fn cancel(&self) {}
        fn name(&self) -> &str {
            "null"
        }
    }

    #[derive(Default)]
    struct NullSurface(u64);

    impl DisplaySurface for NullSurface {
        fn clear(&mut self) {}
        fn append_anchor(&mut self, _content: &str) -> AnchorId {
            self.0 += 1;
            AnchorId(self.0)
        }
        fn append_span(&mut self, _parent: AnchorId, _content: &str) -> AnchorId {
            self.0 += 1;
            AnchorId(self.0)
        }
        fn set_active(&mut self, _anchor: AnchorId, _active: bool) {}
        fn clear_highlights(&mut self) {}
        fn scroll_into_view(&mut self, _anchor: AnchorId, _request: ScrollRequest) {}
    }

    fn controller_with(text: &str) -> PlaybackController {
        let (mut controller, _events) = PlaybackController::new(
            Arc::new(NullBackend),
            VoiceCatalog::ready_with(Vec::new()),
            Box::new(NullSurface::default()),
            PlaybackConfig::default(),
        );
        let segments = Segmenter::new(Granularity::Word, AbbreviationSet::default()).segment(text);
        controller.load_document(&segments, Granularity::Word);
        controller
    }

    #[test]
    fn word_utterance_offsets_track_expansion() {
        let controller = controller_with("NASA launched today");
        let (text, offsets) = controller.word_utterance(0);
        assert_eq!(text, "N A S A launched today");
        assert_eq!(offsets, vec![0, 8, 17]);
    }

    #[test]
    fn offset_maps_to_containing_unit() {
        let mut controller = controller_with("NASA launched today");
        controller.start(1);
        let session = controller.session().unwrap();
        // utterance: "launched today"
        assert_eq!(session.unit_at_offset(0), 1);
        assert_eq!(session.unit_at_offset(9), 2);
        assert_eq!(session.unit_at_offset(500), 2);
    }

    #[test]
    fn start_clamps_index() {
        let mut controller = controller_with("one two three");
        controller.start(99);
        assert_eq!(controller.session().map(PlaybackSession::start_index), Some(2));
    }

    #[test]
    fn start_without_units_is_noop() {
        let mut controller = controller_with("");
        controller.start(0);
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(controller.session().is_none());
        assert_eq!(controller.cursor(), None);
    }
}
