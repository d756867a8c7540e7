//! Voice catalog and static-preference voice selection.
//!
//! Platforms populate their voice list asynchronously and it may be empty
//! at startup. The [`VoiceCatalog`] holds the latest snapshot in a `watch`
//! channel; readiness flips to `true` once the first population completes
//! (even if it produced no voices) and never flips back.

use std::sync::Arc;

use speakdoc_core::{ReaderSettings, VoiceDescriptor, VoiceInventory};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Contents of the catalog at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    /// Whether population has completed at least once.
    pub ready: bool,

    pub voices: Vec<VoiceDescriptor>,
}

/// Shared, asynchronously populated set of available voices.
///
/// Cloning is cheap; clones observe the same catalog.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    tx: Arc<watch::Sender<CatalogSnapshot>>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCatalog {
    /// An empty catalog that is not ready yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CatalogSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// A catalog that is already populated.
    pub fn ready_with(voices: Vec<VoiceDescriptor>) -> Self {
        let catalog = Self::new();
        catalog.publish(voices);
        catalog
    }

    /// Replace the voice list and mark the catalog ready.
    pub fn publish(&self, voices: Vec<VoiceDescriptor>) {
        tracing::debug!(count = voices.len(), "Voice catalog updated");
        self.tx.send_replace(CatalogSnapshot {
            ready: true,
            voices,
        });
    }

    pub fn is_ready(&self) -> bool {
        self.tx.borrow().ready
    }

    /// Current voices (possibly empty).
    pub fn voices(&self) -> Vec<VoiceDescriptor> {
        self.tx.borrow().voices.clone()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.tx.borrow().clone()
    }

    /// Watch for catalog changes.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.tx.subscribe()
    }

    /// Wait until the catalog is ready and return its voices.
    pub async fn wait_ready(&self) -> Vec<VoiceDescriptor> {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting.
        match rx.wait_for(|snapshot| snapshot.ready).await {
            Ok(snapshot) => snapshot.voices.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Populate the catalog from `inventory` on a background task.
    ///
    /// Enumeration failures are logged and leave the catalog ready but
    /// empty, so playback falls back to the backend's default voice.
    pub fn spawn_populate(&self, inventory: Arc<dyn VoiceInventory>) -> JoinHandle<()> {
        let catalog = self.clone();
        tokio::spawn(async move {
            match inventory.voices().await {
                Ok(voices) => catalog.publish(voices),
                Err(e) => {
                    tracing::warn!(error = %e, "Voice enumeration failed; using default voice");
                    catalog.publish(Vec::new());
                }
            }
        })
    }
}

// ── Selection ──────────────────────────────────────────────────────

/// Picks a voice by static preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelector {
    /// Lowercased name substrings, most preferred first.
    preferences: Vec<String>,
    locale: String,
}

impl Default for VoiceSelector {
    fn default() -> Self {
        Self::from_settings(&ReaderSettings::default())
    }
}

impl VoiceSelector {
    pub fn new<I, S>(preferences: I, locale: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            preferences: preferences
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
            locale: locale.into(),
        }
    }

    pub fn from_settings(settings: &ReaderSettings) -> Self {
        Self::new(
            settings.effective_voice_preferences(),
            settings.effective_locale(),
        )
    }

    /// Select a voice:
    ///
    /// 1. the first voice whose name contains a preferred substring,
    ///    preferences tried in order;
    /// 2. else the first voice matching the locale;
    /// 3. else the first voice;
    /// 4. else `None` (backend default).
    pub fn select(&self, voices: &[VoiceDescriptor]) -> Option<VoiceDescriptor> {
        let by_preference = self.preferences.iter().find_map(|preferred| {
            voices
                .iter()
                .find(|v| v.name.to_lowercase().contains(preferred.as_str()))
        });

        by_preference
            .or_else(|| voices.iter().find(|v| same_locale(&v.lang, &self.locale)))
            .or_else(|| voices.first())
            .cloned()
    }
}

fn same_locale(a: &str, b: &str) -> bool {
    let canon = |s: &str| s.trim().replace('_', "-").to_lowercase();
    canon(a) == canon(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Microsoft Mark", "en-GB"),
            VoiceDescriptor::new("Samantha", "en-US"),
        ]
    }

    #[test]
    fn preferred_name_wins() {
        let selector = VoiceSelector::new(["george", "samantha"], "en-US");
        assert_eq!(selector.select(&catalog()).map(|v| v.name), Some("Samantha".to_string()));
    }

    #[test]
    fn preference_order_beats_catalog_order() {
        let voices = vec![
            VoiceDescriptor::new("Samantha", "en-US"),
            VoiceDescriptor::new("George (Enhanced)", "en-GB"),
        ];
        let selector = VoiceSelector::new(["george", "samantha"], "en-US");
        assert_eq!(selector.select(&voices).map(|v| v.lang), Some("en-GB".to_string()));
    }

    #[test]
    fn falls_back_to_locale() {
        let voices = vec![
            VoiceDescriptor::new("Thomas", "fr-FR"),
            VoiceDescriptor::new("Alex", "en_us"),
        ];
        let selector = VoiceSelector::new(["george"], "en-US");
        assert_eq!(selector.select(&voices).map(|v| v.name), Some("Alex".to_string()));
    }

    #[test]
    fn falls_back_to_first_then_none() {
        let voices = vec![VoiceDescriptor::new("Thomas", "fr-FR")];
        let selector = VoiceSelector::new(["george"], "en-US");
        assert_eq!(selector.select(&voices).map(|v| v.name), Some("Thomas".to_string()));
        assert_eq!(selector.select(&[]), None);
    }

    #[test]
    fn catalog_starts_not_ready() {
        let catalog = VoiceCatalog::new();
        assert!(!catalog.is_ready());
        assert!(catalog.voices().is_empty());

        catalog.publish(Vec::new());
        assert!(catalog.is_ready());
    }

    #[test]
    fn wait_ready_resolves_after_publish() {
        let catalog = VoiceCatalog::new();
        let publisher = catalog.clone();

        let voices = tokio_test::block_on(async move {
            let waiter = tokio::spawn(async move { catalog.wait_ready().await });
            tokio::task::yield_now().await;
            publisher.publish(vec![VoiceDescriptor::new("Samantha", "en-US")]);
            waiter.await.unwrap()
        });

        assert_eq!(voices.len(), 1);
    }
}
