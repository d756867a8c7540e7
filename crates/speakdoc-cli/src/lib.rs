//! Command-line front end for speakdoc.
//!
//! `main.rs` is the composition root; everything it wires together lives
//! here so handlers can be tested without a terminal.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod surface;

pub use bootstrap::{CliContext, Synthesizer, bootstrap, load_settings};
pub use commands::{Commands, GranularityArg};
pub use error::CliError;
pub use parser::Cli;
pub use surface::TerminalSurface;
