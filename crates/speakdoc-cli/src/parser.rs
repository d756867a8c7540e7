//! Root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use speakdoc_core::SettingsUpdate;

use crate::commands::Commands;

/// Read documents aloud with a moving highlight.
#[derive(Parser)]
#[command(name = "speakdoc")]
#[command(about = "Read documents aloud, highlighting each word or sentence as it is spoken")]
#[command(version)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true, env = "SPEAKDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Speaking rate multiplier (0.1-10)
    #[arg(long, global = true)]
    pub rate: Option<f32>,

    /// Pitch multiplier (0-2)
    #[arg(long, global = true)]
    pub pitch: Option<f32>,

    /// Preferred voice name (tried before the configured preferences)
    #[arg(long, global = true)]
    pub voice: Option<String>,

    /// Fallback locale for voice selection (e.g. en-GB)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Speak acronyms as written instead of letter by letter
    #[arg(long, global = true)]
    pub no_acronyms: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings overrides given on the command line.
    ///
    /// `--voice` is resolved against the loaded preferences by
    /// [`load_settings`](crate::bootstrap::load_settings).
    pub fn settings_overrides(&self) -> SettingsUpdate {
        SettingsUpdate {
            granularity: self
                .command
                .as_ref()
                .and_then(Commands::granularity)
                .map(Some),
            rate: self.rate.map(Some),
            pitch: self.pitch.map(Some),
            locale: self.locale.clone().map(Some),
            expand_acronyms: self.no_acronyms.then_some(Some(false)),
            ..SettingsUpdate::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use speakdoc_core::Granularity;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "speakdoc",
            "--verbose",
            "--rate",
            "1.5",
            "segment",
            "notes.txt",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.rate, Some(1.5));
        assert!(matches!(cli.command, Some(Commands::Segment { .. })));
    }

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let cli = Cli::parse_from(["speakdoc", "--no-acronyms", "read", "a.txt", "-g", "sentence"]);
        let update = cli.settings_overrides();

        assert_eq!(update.granularity, Some(Some(Granularity::Sentence)));
        assert_eq!(update.expand_acronyms, Some(Some(false)));
        assert!(update.rate.is_none());
        assert!(update.voice_preferences.is_none());
    }

    #[test]
    fn test_no_overrides() {
        let cli = Cli::parse_from(["speakdoc", "voices"]);
        let update = cli.settings_overrides();
        assert!(update.granularity.is_none());
        assert!(update.expand_acronyms.is_none());
    }
}
