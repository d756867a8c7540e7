use serde::{Deserialize, Serialize};

/// A synthesis voice reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// Human-readable voice name (e.g. `"Samantha"`).
    pub name: String,

    /// BCP 47 language tag (e.g. `"en-US"`).
    pub lang: String,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}
