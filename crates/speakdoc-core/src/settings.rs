//! Reader settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies. Loading
//! them from a file or the environment is the composition root's job.

use serde::{Deserialize, Serialize};

use crate::domain::Granularity;

/// Default speaking rate (slightly slower than normal for reading).
pub const DEFAULT_RATE: f32 = 0.55;

/// Default pitch multiplier.
pub const DEFAULT_PITCH: f32 = 0.95;

/// Locale used when no preferred voice name matches.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Vertical distance (page units) above which two PDF text items are on
/// different lines.
pub const DEFAULT_PDF_LINE_THRESHOLD: f32 = 5.0;

/// Title abbreviations whose period never ends a sentence.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &["Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr", "St"];

/// Voice name substrings, most preferred first.
pub const DEFAULT_VOICE_PREFERENCES: &[&str] = &["george", "samantha"];

/// Reader settings.
///
/// All fields are optional to support partial configuration files and
/// graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    /// Segmentation and playback granularity.
    pub granularity: Option<Granularity>,

    /// Speaking rate multiplier (0.1–10.0).
    pub rate: Option<f32>,

    /// Pitch multiplier (0.0–2.0).
    pub pitch: Option<f32>,

    /// Case-insensitive voice name substrings, most preferred first.
    pub voice_preferences: Option<Vec<String>>,

    /// Fallback locale for voice selection (e.g. `"en-US"`).
    pub locale: Option<String>,

    /// Spell out acronyms letter by letter when speaking.
    pub expand_acronyms: Option<bool>,

    /// Abbreviations whose trailing period is not a sentence end.
    pub abbreviations: Option<Vec<String>>,

    /// PDF line reconstruction threshold.
    pub pdf_line_threshold: Option<f32>,
}

impl ReaderSettings {
    /// Create settings with every field set to its default.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            granularity: Some(Granularity::default()),
            rate: Some(DEFAULT_RATE),
            pitch: Some(DEFAULT_PITCH),
            voice_preferences: Some(to_owned_list(DEFAULT_VOICE_PREFERENCES)),
            locale: Some(DEFAULT_LOCALE.to_string()),
            expand_acronyms: Some(true),
            abbreviations: Some(to_owned_list(DEFAULT_ABBREVIATIONS)),
            pdf_line_threshold: Some(DEFAULT_PDF_LINE_THRESHOLD),
        }
    }

    #[must_use]
    pub fn effective_granularity(&self) -> Granularity {
        self.granularity.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_rate(&self) -> f32 {
        self.rate.unwrap_or(DEFAULT_RATE)
    }

    #[must_use]
    pub fn effective_pitch(&self) -> f32 {
        self.pitch.unwrap_or(DEFAULT_PITCH)
    }

    #[must_use]
    pub fn effective_voice_preferences(&self) -> Vec<String> {
        self.voice_preferences
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_VOICE_PREFERENCES))
    }

    #[must_use]
    pub fn effective_locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    #[must_use]
    pub fn effective_expand_acronyms(&self) -> bool {
        self.expand_acronyms.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_abbreviations(&self) -> Vec<String> {
        self.abbreviations
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_ABBREVIATIONS))
    }

    #[must_use]
    pub fn effective_pdf_line_threshold(&self) -> f32 {
        self.pdf_line_threshold.unwrap_or(DEFAULT_PDF_LINE_THRESHOLD)
    }

    /// Merge an update into these settings, only touching fields that are `Some`.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(granularity) = other.granularity {
            self.granularity = granularity;
        }
        if let Some(rate) = other.rate {
            self.rate = rate;
        }
        if let Some(pitch) = other.pitch {
            self.pitch = pitch;
        }
        if let Some(ref prefs) = other.voice_preferences {
            self.voice_preferences.clone_from(prefs);
        }
        if let Some(ref locale) = other.locale {
            self.locale.clone_from(locale);
        }
        if let Some(expand) = other.expand_acronyms {
            self.expand_acronyms = expand;
        }
        if let Some(ref abbreviations) = other.abbreviations {
            self.abbreviations.clone_from(abbreviations);
        }
        if let Some(threshold) = other.pdf_line_threshold {
            self.pdf_line_threshold = threshold;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub granularity: Option<Option<Granularity>>,
    pub rate: Option<Option<f32>>,
    pub pitch: Option<Option<f32>>,
    pub voice_preferences: Option<Option<Vec<String>>>,
    pub locale: Option<Option<String>>,
    pub expand_acronyms: Option<Option<bool>>,
    pub abbreviations: Option<Option<Vec<String>>>,
    pub pdf_line_threshold: Option<Option<f32>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Speaking rate must be between 0.1 and 10.0, got {0}")]
    InvalidRate(f32),

    #[error("Pitch must be between 0.0 and 2.0, got {0}")]
    InvalidPitch(f32),

    #[error("Locale cannot be empty")]
    EmptyLocale,

    #[error("Voice preferences cannot contain empty entries")]
    EmptyVoicePreference,

    #[error("Abbreviation must be alphabetic without the period, got {0:?}")]
    InvalidAbbreviation(String),

    #[error("PDF line threshold must be a positive number, got {0}")]
    InvalidLineThreshold(f32),
}

/// Validate settings values.
pub fn validate_settings(settings: &ReaderSettings) -> Result<(), SettingsError> {
    if let Some(rate) = settings.rate {
        if !(0.1..=10.0).contains(&rate) {
            return Err(SettingsError::InvalidRate(rate));
        }
    }

    if let Some(pitch) = settings.pitch {
        if !(0.0..=2.0).contains(&pitch) {
            return Err(SettingsError::InvalidPitch(pitch));
        }
    }

    if settings
        .locale
        .as_ref()
        .is_some_and(|l| l.trim().is_empty())
    {
        return Err(SettingsError::EmptyLocale);
    }

    if settings
        .voice_preferences
        .as_ref()
        .is_some_and(|prefs| prefs.iter().any(|p| p.trim().is_empty()))
    {
        return Err(SettingsError::EmptyVoicePreference);
    }

    if let Some(ref abbreviations) = settings.abbreviations {
        if let Some(bad) = abbreviations
            .iter()
            .find(|a| a.is_empty() || !a.chars().all(char::is_alphabetic))
        {
            return Err(SettingsError::InvalidAbbreviation(bad.clone()));
        }
    }

    if let Some(threshold) = settings.pdf_line_threshold {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(SettingsError::InvalidLineThreshold(threshold));
        }
    }

    Ok(())
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
