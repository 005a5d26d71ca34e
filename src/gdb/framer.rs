//! Output framer: turns the debugger's unstructured byte stream into one
//! result per command.
//!
//! The debugger emits no length prefix or delimiter, so the framer reads
//! one byte at a time and stops at the first of:
//!
//! | Boundary                  | Trigger                                           |
//! |---------------------------|---------------------------------------------------|
//! | [`Boundary::Prompt`]      | a line or partial buffer ends with the prompt     |
//! | [`Boundary::Idle`]        | quiet after output, confirmed by a second check   |
//! | [`Boundary::Timeout`]     | the wall-clock budget expires                     |
//! | [`Boundary::EndOfStream`] | the pipe returns zero bytes                       |
//! | [`Boundary::Truncated`]   | a line arrives once the limit is already full     |
//!
//! The prompt text itself is never part of a result. A line or fragment
//! carrying the prompt is consumed as the boundary; only the text before
//! the prompt, if any, is kept.
//!
//! The idle check only fires once a line has been collected and nothing is
//! buffered. A producer that pauses longer than the confirmation window
//! is cut short; that bounded latency is preferred over an unbounded wait.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info_span, Instrument};

use crate::gdb::session::ProcessSession;
use crate::models::framed::{truncation_marker, Boundary, FramedResult};
use crate::SessionError;

/// Readability slice for each poll.
pub const POLL_SLICE: Duration = Duration::from_millis(100);

/// Pause before re-checking a quiet stream.
pub const IDLE_CONFIRM: Duration = Duration::from_millis(50);

/// Final readability check after [`IDLE_CONFIRM`].
pub const IDLE_RECHECK: Duration = Duration::from_millis(10);

/// Reads command output until a framing boundary.
#[derive(Debug, Clone)]
pub struct OutputFramer {
    prompt: String,
    max_lines: usize,
    idle_completion: bool,
}

impl OutputFramer {
    /// Framer for command output: all boundaries enabled.
    #[must_use]
    pub fn new(prompt: impl Into<String>, max_lines: usize) -> Self {
        Self {
            prompt: prompt.into(),
            max_lines,
            idle_completion: true,
        }
    }

    /// Framer for the startup banner.
    ///
    /// The idle boundary and the line limit are both disabled: the banner
    /// may pause while plugins load or run long, and stopping early would
    /// leave the prompt in the pipe for the first command to trip over.
    #[must_use]
    pub fn startup(prompt: impl Into<String>) -> Self {
        Self {
            idle_completion: false,
            ..Self::new(prompt, usize::MAX)
        }
    }

    /// Prompt sentinel this framer watches for.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Run `command` against a ready session and frame its output.
    ///
    /// A closed stream or transport fault means the debugger is gone; the
    /// session is torn down before returning.
    ///
    /// # Errors
    ///
    /// - `SessionError::SessionNotReady`: the session is not `Ready`; no
    ///   pipe is touched.
    /// - `SessionError::Transport`: writing or reading a pipe failed.
    pub async fn execute(
        &self,
        session: &mut ProcessSession,
        command: &str,
        budget: Duration,
    ) -> Result<FramedResult, SessionError> {
        session.reap_if_exited();
        if !session.is_ready() {
            return Err(SessionError::SessionNotReady);
        }

        let result = {
            let Some(process) = session.process_mut() else {
                return Err(SessionError::SessionNotReady);
            };
            self.exchange(&mut process.output, &mut process.stdin, command, budget)
                .await
        };

        if matches!(
            result,
            Err(_)
                | Ok(FramedResult {
                    boundary: Boundary::EndOfStream,
                    ..
                })
        ) {
            session.mark_lost().await;
        }

        result
    }

    /// Write `command` and read its framed output.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transport` on pipe I/O failure.
    pub async fn exchange<R, W>(
        &self,
        reader: &mut R,
        writer: &mut W,
        command: &str,
        budget: Duration,
    ) -> Result<FramedResult, SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let span = info_span!("frame_command", command);
        async move {
            write_command(writer, command).await?;
            self.read_until_boundary(reader, budget).await
        }
        .instrument(span)
        .await
    }

    /// Read from `reader` until a framing boundary or `budget` elapses.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transport` if a read fails.
    pub async fn read_until_boundary<R>(
        &self,
        reader: &mut R,
        budget: Duration,
    ) -> Result<FramedResult, SessionError>
    where
        R: AsyncRead + Unpin,
    {
        let deadline = Instant::now() + budget;
        let prompt = self.prompt.as_bytes();
        let prompt_trimmed = self.prompt.trim_end();
        let mut lines: Vec<String> = Vec::new();
        let mut buffer: Vec<u8> = Vec::new();
        let mut byte = [0u8; 1];

        let boundary = loop {
            let now = Instant::now();
            if now >= deadline {
                break Boundary::Timeout;
            }
            let slice = POLL_SLICE.min(deadline - now);

            let read = match timeout(slice, reader.read(&mut byte)).await {
                Ok(read) => read,
                Err(_elapsed) => {
                    if !(self.idle_completion && !lines.is_empty() && buffer.is_empty()) {
                        continue;
                    }
                    sleep(IDLE_CONFIRM.min(deadline.saturating_duration_since(Instant::now())))
                        .await;
                    let recheck =
                        IDLE_RECHECK.min(deadline.saturating_duration_since(Instant::now()));
                    match timeout(recheck, reader.read(&mut byte)).await {
                        Ok(read) => read,
                        Err(_elapsed) => break Boundary::Idle,
                    }
                }
            };

            if read? == 0 {
                break Boundary::EndOfStream;
            }
            buffer.push(byte[0]);

            if byte[0] == b'\n' {
                let line = decode_line(&buffer);
                buffer.clear();
                match strip_prompt(&line, prompt_trimmed) {
                    Some(rest) => {
                        if !rest.is_empty() {
                            self.push_line(&mut lines, rest.to_owned());
                        }
                        break Boundary::Prompt;
                    }
                    None => {
                        if !line.is_empty() && self.push_line(&mut lines, line) {
                            break Boundary::Truncated;
                        }
                    }
                }
            } else if buffer.ends_with(prompt) {
                let head = &buffer[..buffer.len() - prompt.len()];
                let fragment = String::from_utf8_lossy(head);
                let fragment = fragment.trim();
                if !fragment.is_empty() {
                    self.push_line(&mut lines, fragment.to_owned());
                }
                buffer.clear();
                break Boundary::Prompt;
            }
        };

        // Trailing partial line that never reached a terminator or prompt.
        let rest = String::from_utf8_lossy(&buffer);
        let rest = rest.trim();
        if !rest.is_empty() {
            self.push_line(&mut lines, rest.to_owned());
        }

        debug!(?boundary, lines = lines.len(), "output framed");
        Ok(FramedResult { lines, boundary })
    }

    /// Append `line`, or the truncation marker once `max_lines` lines are
    /// already held. Returns `true` when the marker was appended.
    fn push_line(&self, lines: &mut Vec<String>, line: String) -> bool {
        if lines.len() < self.max_lines {
            lines.push(line);
            return false;
        }
        lines.push(truncation_marker(self.max_lines));
        true
    }
}

/// Write `command` plus a newline and flush.
///
/// # Errors
///
/// Returns `SessionError::Transport` if the write or flush fails.
pub async fn write_command<W>(writer: &mut W, command: &str) -> Result<(), SessionError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = String::with_capacity(command.len() + 1);
    line.push_str(command);
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|err| SessionError::Transport(format!("failed to write command: {err}")))?;
    writer
        .flush()
        .await
        .map_err(|err| SessionError::Transport(format!("failed to flush command: {err}")))
}

/// Decode a completed line, dropping the terminator.
fn decode_line(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer)
        .trim_end_matches(['\n', '\r'])
        .to_owned()
}

/// If `line` ends with the prompt, return the text before it.
fn strip_prompt<'a>(line: &'a str, prompt: &str) -> Option<&'a str> {
    line.trim_end().strip_suffix(prompt).map(str::trim_end)
}
