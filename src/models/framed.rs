//! Framed command output returned by the output framer.

/// Why the framer stopped reading for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The prompt sentinel was observed.
    Prompt,
    /// The child went quiet after producing at least one line.
    Idle,
    /// The time budget expired without a prompt.
    Timeout,
    /// The output stream closed (EOF or process exit).
    EndOfStream,
    /// The line limit was reached and the truncation marker appended.
    Truncated,
}

/// Ordered output lines collected for one command.
///
/// A result is produced for every boundary kind; a missing prompt is not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedResult {
    /// Non-empty output lines in arrival order.
    pub lines: Vec<String>,
    /// How the read loop terminated.
    pub boundary: Boundary,
}

impl FramedResult {
    /// Whether no output was captured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the collected lines with `\n`.
    ///
    /// An empty result renders as a placeholder naming `command` so callers
    /// can tell "ran, printed nothing" apart from a transport failure.
    #[must_use]
    pub fn render(&self, command: &str) -> String {
        if self.lines.is_empty() {
            return no_output_placeholder(command);
        }
        self.lines.join("\n")
    }
}

/// Placeholder text for a command that produced no output.
#[must_use]
pub fn no_output_placeholder(command: &str) -> String {
    format!("Command '{command}' executed (no output)")
}

/// Marker line appended when output exceeds `limit` lines.
#[must_use]
pub fn truncation_marker(limit: usize) -> String {
    format!("... (output truncated: {limit} lines)")
}
