//! Timer-driven speech stand-in.
//!
//! Walks the utterance word by word on a tokio task and reports a boundary
//! for each word at a pace derived from the utterance rate. No audio is
//! produced. Used for dry runs and deterministic tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use speakdoc_core::{
    SpeechBackend, SpeechEventSink, SpeechPortError, Utterance, VoiceDescriptor, VoiceInventory,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Words per minute at rate 1.0.
const BASE_WORDS_PER_MINUTE: f32 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Run,
    Pause,
    Cancel,
}

struct ActiveUtterance {
    control: watch::Sender<Control>,
    task: JoinHandle<()>,
}

/// A [`SpeechBackend`] that simulates speech with timers.
pub struct PacedBackend {
    /// Fixed delay per word; when `None` it is derived from the rate.
    word_interval: Option<Duration>,
    voices: Vec<VoiceDescriptor>,
    current: Mutex<Option<ActiveUtterance>>,
}

impl Default for PacedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PacedBackend {
    pub fn new() -> Self {
        Self {
            word_interval: None,
            voices: vec![VoiceDescriptor::new("Paced", "en-US")],
            current: Mutex::new(None),
        }
    }

    /// Use the same delay for every word regardless of rate.
    #[must_use]
    pub const fn with_word_interval(mut self, interval: Duration) -> Self {
        self.word_interval = Some(interval);
        self
    }

    /// Voices reported through [`VoiceInventory`].
    #[must_use]
    pub fn with_voices(mut self, voices: Vec<VoiceDescriptor>) -> Self {
        self.voices = voices;
        self
    }

    fn interval_for(&self, rate: f32) -> Duration {
        self.word_interval.unwrap_or_else(|| {
            let words_per_minute = BASE_WORDS_PER_MINUTE * rate.max(0.1);
            Duration::from_secs_f32(60.0 / words_per_minute)
        })
    }

    fn send(&self, control: Control) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = current.as_ref() {
            active.control.send_replace(control);
        }
    }
}

impl SpeechBackend for PacedBackend {
    fn speak(&self, utterance: Utterance, events: SpeechEventSink) -> Result<(), SpeechPortError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SpeechPortError::Unavailable(format!("no tokio runtime: {e}")))?;

        let interval = self.interval_for(utterance.rate);
        let (control, control_rx) = watch::channel(Control::Run);
        let task = runtime.spawn(run_utterance(utterance.text, interval, events, control_rx));

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(ActiveUtterance { control, task }) {
            previous.control.send_replace(Control::Cancel);
            previous.task.abort();
        }
        Ok(())
    }

    fn pause(&self) {
        self.send(Control::Pause);
    }

    fn resume(&self) {
        self.send(Control::Run);
    }

    fn cancel(&self) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(active) = previous {
            active.control.send_replace(Control::Cancel);
            active.task.abort();
        }
    }

    fn name(&self) -> &str {
        "paced"
    }
}

#[async_trait]
impl VoiceInventory for PacedBackend {
    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechPortError> {
        Ok(self.voices.clone())
    }
}

impl std::fmt::Debug for PacedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacedBackend")
            .field("word_interval", &self.word_interval)
            .field("voices", &self.voices.len())
            .finish_non_exhaustive()
    }
}

/// Byte offsets of every whitespace-separated word in `text`.
fn word_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut previous_was_space = true;
    for (i, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        if previous_was_space && !is_space {
            offsets.push(i);
        }
        previous_was_space = is_space;
    }
    offsets
}

async fn run_utterance(
    text: String,
    interval: Duration,
    events: SpeechEventSink,
    mut control: watch::Receiver<Control>,
) {
    events.started();

    for offset in word_offsets(&text) {
        if !wait_until_running(&mut control).await {
            return;
        }
        if !events.boundary(Some(offset)) {
            return;
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            changed = control.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }

    if wait_until_running(&mut control).await {
        events.ended();
    }
}

/// Block while paused. Returns `false` once cancelled.
async fn wait_until_running(control: &mut watch::Receiver<Control>) -> bool {
    loop {
        let current = *control.borrow_and_update();
        match current {
            Control::Run => return true,
            Control::Cancel => return false,
            Control::Pause => {}
        }
        if control.changed().await.is_err() {
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use speakdoc_core::{SessionId, SpeechEvent};
    use tokio::sync::mpsc;

    use super::*;

    fn utterance(text: &str) -> Utterance {
        Utterance {
            text: text.to_string(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
        }
    }

    #[test]
    fn offsets_skip_whitespace_runs() {
        assert_eq!(word_offsets("  one two\n three"), vec![2, 6, 12]);
        assert!(word_offsets("   ").is_empty());
    }

    #[test]
    fn interval_scales_with_rate() {
        let backend = PacedBackend::new();
        assert!(backend.interval_for(2.0) < backend.interval_for(0.5));
        let fixed = PacedBackend::new().with_word_interval(Duration::from_millis(3));
        assert_eq!(fixed.interval_for(0.5), Duration::from_millis(3));
    }

    #[tokio::test]
    async fn emits_boundaries_then_end() {
        let backend = PacedBackend::new().with_word_interval(Duration::from_millis(1));
        let (tx, mut rx) = mpsc::unbounded_channel();

        backend
            .speak(utterance("N A S A launched"), SpeechEventSink::new(SessionId(9), tx))
            .unwrap();

        let mut events = Vec::new();
        while let Some(notification) = rx.recv().await {
            assert_eq!(notification.session, SessionId(9));
            let done = notification.event == SpeechEvent::Ended;
            events.push(notification.event);
            if done {
                break;
            }
        }

        assert_eq!(events.first(), Some(&SpeechEvent::Started));
        assert_eq!(events.len(), 7);
        assert_eq!(
            events[5],
            SpeechEvent::Boundary {
                char_index: Some(8)
            }
        );
    }

    #[tokio::test]
    async fn cancel_suppresses_end() {
        let backend = PacedBackend::new().with_word_interval(Duration::from_secs(60));
        let (tx, mut rx) = mpsc::unbounded_channel();

        backend
            .speak(utterance("one two"), SpeechEventSink::new(SessionId(1), tx))
            .unwrap();
        backend.cancel();

        let mut seen = Vec::new();
        while let Some(notification) = rx.recv().await {
            seen.push(notification.event);
        }
        assert!(!seen.contains(&SpeechEvent::Ended));
    }

    #[test]
    fn speak_outside_runtime_is_unavailable() {
        let backend = PacedBackend::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = backend.speak(utterance("hi"), SpeechEventSink::new(SessionId(1), tx));
        assert!(matches!(result, Err(SpeechPortError::Unavailable(_))));
    }
}
