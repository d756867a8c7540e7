//! CLI bootstrap - the composition root.
//!
//! Settings are resolved in order: defaults, the JSON settings file, then
//! command-line overrides. The concrete synthesizer, voice catalog and
//! document source are chosen here and handed to handlers as a
//! [`CliContext`].

use std::path::Path;
use std::sync::Arc;

use speakdoc_core::{
    ReaderSettings, SettingsUpdate, SpeechBackend, VoiceInventory, validate_settings,
};
use speakdoc_extract::FileDocumentSource;
use speakdoc_voice::{PacedBackend, VoiceCatalog};

use crate::error::CliError;

/// Which synthesizer to drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesizer {
    /// Silent timer-driven stand-in.
    Paced,
    /// The `espeak-ng` executable at `program`.
    Espeak { program: String },
}

impl Synthesizer {
    pub fn from_flags(dry_run: bool, program: &str) -> Self {
        if dry_run {
            Self::Paced
        } else {
            Self::Espeak {
                program: program.to_string(),
            }
        }
    }
}

/// Everything a handler needs.
pub struct CliContext {
    pub settings: ReaderSettings,
    pub backend: Arc<dyn SpeechBackend>,
    /// Populated in the background from the synthesizer's voice list.
    pub catalog: VoiceCatalog,
    pub source: FileDocumentSource,
}

impl std::fmt::Debug for CliContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliContext")
            .field("settings", &self.settings)
            .field("backend", &self.backend.name())
            .field("catalog_ready", &self.catalog.is_ready())
            .finish_non_exhaustive()
    }
}

/// Resolve settings from an optional JSON file plus overrides.
///
/// `preferred_voice` is tried before every configured preference.
pub fn load_settings(
    path: Option<&Path>,
    overrides: &SettingsUpdate,
    preferred_voice: Option<&str>,
) -> Result<ReaderSettings, CliError> {
    let mut settings = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
            let parsed: ReaderSettings = serde_json::from_str(&raw)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
            tracing::debug!(path = %path.display(), "Loaded settings file");
            parsed
        }
        None => ReaderSettings::default(),
    };

    settings.merge(overrides);

    if let Some(voice) = preferred_voice.map(str::trim).filter(|v| !v.is_empty()) {
        let mut preferences = settings.effective_voice_preferences();
        preferences.insert(0, voice.to_string());
        settings.voice_preferences = Some(preferences);
    }

    validate_settings(&settings)?;
    Ok(settings)
}

/// Build the handler context and start voice enumeration.
///
/// Must be called inside a tokio runtime.
pub fn bootstrap(settings: ReaderSettings, synthesizer: &Synthesizer) -> CliContext {
    let (backend, inventory) = speech_stack(synthesizer);
    tracing::debug!(backend = backend.name(), "Speech backend selected");

    let catalog = VoiceCatalog::new();
    catalog.spawn_populate(inventory);

    let source =
        FileDocumentSource::new().with_line_threshold(settings.effective_pdf_line_threshold());

    CliContext {
        settings,
        backend,
        catalog,
        source,
    }
}

#[cfg(unix)]
fn speech_stack(synthesizer: &Synthesizer) -> (Arc<dyn SpeechBackend>, Arc<dyn VoiceInventory>) {
    match synthesizer {
        Synthesizer::Paced => paced_stack(),
        Synthesizer::Espeak { program } => {
            let espeak = Arc::new(speakdoc_voice::EspeakBackend::with_program(program.as_str()));
            let backend: Arc<dyn SpeechBackend> = espeak.clone();
            let inventory: Arc<dyn VoiceInventory> = espeak;
            (backend, inventory)
        }
    }
}

#[cfg(not(unix))]
fn speech_stack(synthesizer: &Synthesizer) -> (Arc<dyn SpeechBackend>, Arc<dyn VoiceInventory>) {
    if let Synthesizer::Espeak { program } = synthesizer {
        tracing::warn!(%program, "espeak-ng is only supported on unix; using the paced synthesizer");
    }
    paced_stack()
}

fn paced_stack() -> (Arc<dyn SpeechBackend>, Arc<dyn VoiceInventory>) {
    let paced = Arc::new(PacedBackend::new());
    let backend: Arc<dyn SpeechBackend> = paced.clone();
    let inventory: Arc<dyn VoiceInventory> = paced;
    (backend, inventory)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use speakdoc_core::Granularity;

    use super::*;

    #[test]
    fn defaults_without_file() {
        let settings = load_settings(None, &SettingsUpdate::default(), None).unwrap();
        assert_eq!(settings.effective_granularity(), Granularity::Word);
        assert!((settings.effective_rate() - 0.55).abs() < f32::EPSILON);
    }

    #[test]
    fn file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rate": 1.2, "granularity": "sentence", "locale": "en-GB"}}"#).unwrap();

        let overrides = SettingsUpdate {
            rate: Some(Some(2.0)),
            ..SettingsUpdate::default()
        };
        let settings = load_settings(Some(file.path()), &overrides, None).unwrap();

        assert!((settings.effective_rate() - 2.0).abs() < f32::EPSILON);
        assert_eq!(settings.effective_granularity(), Granularity::Sentence);
        assert_eq!(settings.effective_locale(), "en-GB");
    }

    #[test]
    fn preferred_voice_goes_first() {
        let settings = load_settings(None, &SettingsUpdate::default(), Some("Daniel")).unwrap();
        let preferences = settings.effective_voice_preferences();
        assert_eq!(preferences[0], "Daniel");
        assert!(preferences.len() > 1);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let overrides = SettingsUpdate {
            pitch: Some(Some(5.0)),
            ..SettingsUpdate::default()
        };
        let err = load_settings(None, &overrides, None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_settings(Some(file.path()), &SettingsUpdate::default(), None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn synthesizer_from_flags() {
        assert_eq!(Synthesizer::from_flags(true, "espeak-ng"), Synthesizer::Paced);
        assert_eq!(
            Synthesizer::from_flags(false, "espeak"),
            Synthesizer::Espeak {
                program: "espeak".to_string()
            }
        );
    }

    #[tokio::test]
    async fn paced_bootstrap_populates_catalog() {
        let ctx = bootstrap(ReaderSettings::default(), &Synthesizer::Paced);
        let voices = ctx.catalog.wait_ready().await;
        assert_eq!(voices.len(), 1);
        assert_eq!(ctx.backend.name(), "paced");
    }
}
