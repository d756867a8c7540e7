//! CLI error type and exit codes.

use speakdoc_core::{DocumentPortError, SettingsError};
use speakdoc_voice::ReaderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Bad or unreadable settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document could not be loaded.
    #[error("Document error: {0}")]
    Document(String),

    /// The synthesizer failed or is missing.
    #[error("Speech error: {0}")]
    Speech(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Exit code following sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Document(_) => 66, // EX_NOINPUT
            Self::Speech(_) => 69,   // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<DocumentPortError> for CliError {
    fn from(err: DocumentPortError) -> Self {
        match err {
            DocumentPortError::NoPdfProvider => Self::Document(PDF_UNSUPPORTED.to_string()),
            other => Self::Document(other.to_string()),
        }
    }
}

/// The CLI has no PDF text provider wired in.
pub const PDF_UNSUPPORTED: &str =
    "PDF text extraction is not available in the command-line reader; convert the file to .txt or .docx";

impl From<ReaderError> for CliError {
    fn from(err: ReaderError) -> Self {
        match err {
            ReaderError::InvalidSettings(e) => e.into(),
            ReaderError::Document(e) => e.into(),
            ReaderError::VoicesNotReady => Self::Speech(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
