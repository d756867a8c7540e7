//! Command handlers.
//!
//! Handlers take the composed [`CliContext`](crate::bootstrap::CliContext),
//! call into the library crates and format output for the terminal.

pub mod read;
pub mod segment;
pub mod voices;
