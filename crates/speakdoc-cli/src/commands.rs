//! Available subcommands.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use speakdoc_core::Granularity;

/// Unit size on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    Word,
    Sentence,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Word => Self::Word,
            GranularityArg::Sentence => Self::Sentence,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the units a document is split into
    Segment {
        /// Document to segment (.txt, .docx; PDF is not supported by the CLI)
        file: PathBuf,
        /// Split into words or sentences (defaults to the configured granularity)
        #[arg(short, long, value_enum)]
        granularity: Option<GranularityArg>,
        /// Print units as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available voices and show which one would be used
    Voices {
        /// Use the silent paced synthesizer instead of espeak-ng
        #[arg(long)]
        dry_run: bool,
        /// Print voices as JSON
        #[arg(long)]
        json: bool,
        /// espeak-ng executable to query
        #[arg(long, env = "SPEAKDOC_ESPEAK", default_value = "espeak-ng")]
        program: String,
    },

    /// Read a document aloud with a terminal highlight
    ///
    /// While reading, type a command and press enter:
    /// p = pause, r = resume, s = stop, <n> = jump to unit n, q = quit.
    Read {
        /// Document to read (.txt, .docx; PDF is not supported by the CLI)
        file: PathBuf,
        /// Unit index to start from
        #[arg(short, long, default_value = "0")]
        from: usize,
        /// Split into words or sentences (defaults to the configured granularity)
        #[arg(short, long, value_enum)]
        granularity: Option<GranularityArg>,
        /// Use the silent paced synthesizer instead of espeak-ng
        #[arg(long)]
        dry_run: bool,
        /// espeak-ng executable to run
        #[arg(long, env = "SPEAKDOC_ESPEAK", default_value = "espeak-ng")]
        program: String,
    },
}

impl Commands {
    /// Granularity requested on the command line, if any.
    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Self::Segment { granularity, .. } | Self::Read { granularity, .. } => {
                granularity.map(Granularity::from)
            }
            Self::Voices { .. } => None,
        }
    }
}
