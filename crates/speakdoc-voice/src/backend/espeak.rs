//! `espeak-ng` process backend.
//!
//! Each utterance runs as one `espeak-ng` child reading its text from
//! stdin. Pause and resume stop and continue the process with
//! `SIGSTOP`/`SIGCONT`; cancel kills it. `espeak-ng` reports no word
//! boundaries, so the cursor only moves at utterance ends.

use std::process::Stdio;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use speakdoc_core::{
    SpeechBackend, SpeechEventSink, SpeechPortError, Utterance, VoiceDescriptor, VoiceInventory,
};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::task::JoinHandle;

const DEFAULT_PROGRAM: &str = "espeak-ng";

/// espeak-ng speed (words per minute) at rate 1.0.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// espeak-ng pitch (0–99) at pitch 1.0.
const BASE_PITCH: f32 = 50.0;

struct RunningChild {
    pid: Option<u32>,
    task: JoinHandle<()>,
}

/// A [`SpeechBackend`] driving the `espeak-ng` command-line synthesizer.
pub struct EspeakBackend {
    program: String,
    current: Mutex<Option<RunningChild>>,
}

impl Default for EspeakBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EspeakBackend {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a different executable (e.g. `espeak` or an absolute path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: Mutex::new(None),
        }
    }

    fn command_for(&self, utterance: &Utterance) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-s")
            .arg(speed_arg(utterance.rate).to_string())
            .arg("-p")
            .arg(pitch_arg(utterance.pitch).to_string());
        if let Some(voice) = &utterance.voice {
            command.arg("-v").arg(&voice.lang);
        }
        command
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn signal_current(&self, sig: Signal) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pid) = current.as_ref().and_then(|c| c.pid) {
            send_signal(pid, sig);
        }
    }
}

impl SpeechBackend for EspeakBackend {
    fn speak(&self, utterance: Utterance, events: SpeechEventSink) -> Result<(), SpeechPortError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SpeechPortError::Unavailable(format!("no tokio runtime: {e}")))?;

        let mut child = self.command_for(&utterance).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechPortError::Unavailable(format!("{} not found", self.program))
            } else {
                SpeechPortError::Io(e)
            }
        })?;
        let pid = child.id();
        tracing::debug!(pid = ?pid, program = %self.program, "espeak-ng started");

        let task = runtime.spawn(async move {
            events.started();

            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(utterance.text.as_bytes()).await {
                    events.failed(format!("failed to write utterance: {e}"));
                    return;
                }
                // Dropping stdin closes the pipe so espeak-ng sees EOF.
            }

            match child.wait_with_output().await {
                Ok(output) if output.status.success() => {
                    events.ended();
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    events.failed(format!("espeak-ng exited with {}: {}", output.status, stderr.trim()));
                }
                Err(e) => {
                    events.failed(format!("espeak-ng wait failed: {e}"));
                }
            }
        });

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(RunningChild { pid, task }) {
            previous.task.abort();
        }
        Ok(())
    }

    fn pause(&self) {
        self.signal_current(Signal::SIGSTOP);
    }

    fn resume(&self) {
        self.signal_current(Signal::SIGCONT);
    }

    fn cancel(&self) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = previous {
            // Aborting drops the child, and kill_on_drop sends SIGKILL.
            running.task.abort();
            if let Some(pid) = running.pid {
                send_signal(pid, Signal::SIGKILL);
            }
        }
    }

    fn name(&self) -> &str {
        "espeak-ng"
    }
}

#[async_trait]
impl VoiceInventory for EspeakBackend {
    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechPortError> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SpeechPortError::Unavailable(format!("{} not found", self.program))
                } else {
                    SpeechPortError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(SpeechPortError::Unavailable(format!(
                "{} --voices exited with {}",
                self.program, output.status
            )));
        }

        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(count = voices.len(), "espeak-ng voices listed");
        Ok(voices)
    }
}

impl std::fmt::Debug for EspeakBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspeakBackend")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn speed_arg(rate: f32) -> u32 {
    (BASE_WORDS_PER_MINUTE * rate).round().clamp(80.0, 450.0) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pitch_arg(pitch: f32) -> u32 {
    (BASE_PITCH * pitch).round().clamp(0.0, 99.0) as u32
}

#[allow(clippy::cast_possible_wrap)]
fn send_signal(pid: u32, sig: Signal) {
    if let Err(e) = signal::kill(Pid::from_raw(pid as i32), sig) {
        // Process may have already exited
        if e != nix::errno::Errno::ESRCH {
            tracing::warn!(pid, signal = ?sig, error = %e, "Failed to signal espeak-ng");
        }
    }
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  en-us           --/M      English_(America)  gmw/en-US            (en 10)
/// ```
fn parse_voice_list(output: &str) -> Vec<VoiceDescriptor> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_, lang, _, name, ..] => Some(VoiceDescriptor::new(name.replace('_', " "), *lang)),
                _ => None,
            }
        })
        .collect()
}
