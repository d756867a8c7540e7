//! Read command handler.
//!
//! Opens the document, starts reading and then multiplexes three inputs
//! until the session completes or the user quits:
//!
//! - speech progress from the synthesizer
//! - single-line commands on stdin
//! - Ctrl-C

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use speakdoc_core::{FinishReason, PlaybackState, ReaderEvent};
use speakdoc_voice::Reader;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::surface::TerminalSurface;

/// A command typed while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    Pause,
    Resume,
    Stop,
    Seek(usize),
    Quit,
}

impl ReaderCommand {
    /// Parse one input line. Returns `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "s" | "stop" => Some(Self::Stop),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => line.parse().ok().map(Self::Seek),
        }
    }
}

/// What the event stream says about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Progress {
    Running,
    Stopped,
    Completed,
    Failed(String),
}

pub async fn execute(ctx: &CliContext, file: &Path, from: usize) -> Result<()> {
    let (mut reader, mut events) = Reader::new(
        Arc::clone(&ctx.backend),
        ctx.catalog.clone(),
        Box::new(TerminalSurface::stdout()),
        &ctx.settings,
    )
    .map_err(CliError::from)?;

    let units = reader
        .open(&ctx.source, file)
        .await
        .map_err(CliError::from)?;
    if units == 0 {
        println!("{} has no readable text.", file.display());
        return Ok(());
    }

    ctx.catalog.wait_ready().await;
    eprintln!(
        "Reading {units} {} units with {}. Commands: p pause, r resume, s stop, <n> jump, q quit.",
        reader.granularity(),
        ctx.backend.name()
    );

    if from == 0 {
        reader.read_from_start().map_err(CliError::from)?;
    } else {
        reader.seek(from);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            () = reader.process_next_speech_event() => {}
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match ReaderCommand::parse(&line) {
                    Some(ReaderCommand::Quit) => break,
                    Some(command) => apply(&mut reader, command),
                    None if line.trim().is_empty() => {}
                    None => eprintln!("Unknown command: {}", line.trim()),
                },
                None => {
                    tracing::debug!("stdin closed");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }

        match drain_events(&mut events) {
            Progress::Running => {}
            Progress::Stopped => {
                if stdin_open {
                    eprintln!("Stopped. Enter a unit number to continue, or q to quit.");
                }
            }
            Progress::Completed => break,
            Progress::Failed(message) => {
                reader.stop();
                return Err(CliError::Speech(message).into());
            }
        }

        if !stdin_open && reader.controller().state() == PlaybackState::Idle {
            break;
        }
    }

    reader.stop();
    Ok(())
}

fn apply(reader: &mut Reader, command: ReaderCommand) {
    tracing::debug!(?command, "Reader command");
    match command {
        ReaderCommand::Pause => reader.pause(),
        ReaderCommand::Resume => reader.resume(),
        ReaderCommand::Stop => reader.stop(),
        ReaderCommand::Seek(index) => reader.seek(index),
        ReaderCommand::Quit => {}
    }
}

/// Consume every queued event and summarize the latest outcome.
fn drain_events(events: &mut mpsc::UnboundedReceiver<ReaderEvent>) -> Progress {
    let mut progress = Progress::Running;
    while let Ok(event) = events.try_recv() {
        tracing::debug!(?event, "Reader event");
        match event {
            ReaderEvent::Error { message } => progress = Progress::Failed(message),
            ReaderEvent::SessionFinished { reason, .. } => {
                if matches!(progress, Progress::Failed(_)) {
                    continue;
                }
                progress = match reason {
                    FinishReason::Completed => Progress::Completed,
                    FinishReason::Stopped => Progress::Stopped,
                    FinishReason::Failed => Progress::Failed("speech failed".to_string()),
                };
            }
            ReaderEvent::SessionStarted { .. } => {
                if !matches!(progress, Progress::Failed(_)) {
                    progress = Progress::Running;
                }
            }
            _ => {}
        }
    }
    progress
}

#[cfg(test)]
mod tests {
    use speakdoc_core::SessionId;

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(ReaderCommand::parse("p"), Some(ReaderCommand::Pause));
        assert_eq!(ReaderCommand::parse(" Resume \n"), Some(ReaderCommand::Resume));
        assert_eq!(ReaderCommand::parse("s"), Some(ReaderCommand::Stop));
        assert_eq!(ReaderCommand::parse("12"), Some(ReaderCommand::Seek(12)));
        assert_eq!(ReaderCommand::parse("Q"), Some(ReaderCommand::Quit));
        assert_eq!(ReaderCommand::parse("-3"), None);
        assert_eq!(ReaderCommand::parse("jump"), None);
    }

    #[test]
    fn seek_restart_is_running() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ReaderEvent::SessionFinished {
            session: SessionId(1),
            reason: FinishReason::Stopped,
        })
        .unwrap();
        tx.send(ReaderEvent::SessionStarted {
            session: SessionId(2),
            start_index: 4,
            voice: None,
        })
        .unwrap();

        assert_eq!(drain_events(&mut rx), Progress::Running);
    }

    #[test]
    fn error_wins_over_finish() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ReaderEvent::Error {
            message: "espeak-ng exited".to_string(),
        })
        .unwrap();
        tx.send(ReaderEvent::SessionFinished {
            session: SessionId(1),
            reason: FinishReason::Failed,
        })
        .unwrap();

        assert_eq!(
            drain_events(&mut rx),
            Progress::Failed("espeak-ng exited".to_string())
        );
    }

    #[test]
    fn completion_detected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ReaderEvent::SessionFinished {
            session: SessionId(3),
            reason: FinishReason::Completed,
        })
        .unwrap();
        assert_eq!(drain_events(&mut rx), Progress::Completed);
    }
}
