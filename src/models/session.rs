//! Debugger session lifecycle model.

use std::fmt::{Display, Formatter};

/// Connection status of the single debugger session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No child process exists.
    #[default]
    Disconnected,
    /// Child spawned; startup banner is being absorbed.
    Starting,
    /// Prompt absorbed; commands may be issued.
    Ready,
    /// Termination requested; handle is being released.
    Terminating,
}

impl SessionStatus {
    /// Determine whether a lifecycle transition is permitted.
    ///
    /// Every live state may fall back to `Disconnected` when the child
    /// exits unexpectedly.
    #[must_use]
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Disconnected, SessionStatus::Starting)
                | (
                    SessionStatus::Starting,
                    SessionStatus::Ready | SessionStatus::Disconnected
                )
                | (
                    SessionStatus::Ready,
                    SessionStatus::Terminating | SessionStatus::Disconnected
                )
                | (SessionStatus::Terminating, SessionStatus::Disconnected)
        )
    }

    /// Lowercase label used in status reports and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Terminating => "terminating",
        }
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
