//! Error types shared across the application.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering host-level failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// MCP protocol or transport failure.
    Mcp(String),
    /// Debugger session lifecycle or transport failure.
    Session(SessionError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Mcp(msg) => write!(f, "mcp: {msg}"),
            Self::Session(err) => write!(f, "session: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// Structured failures raised by the debugger session and output framer.
///
/// These never cross the tool boundary as errors: handlers render them
/// into text with [`Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `start` was called while a session is not `Disconnected`.
    AlreadyActive,
    /// `stop` was called while no session exists.
    NotActive,
    /// The requested target binary does not exist.
    TargetNotFound(PathBuf),
    /// The debugger exited during startup.
    ProcessDied,
    /// A command was issued before the session reached `Ready`.
    SessionNotReady,
    /// Pipe write/read or spawn failure.
    Transport(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyActive => write!(
                f,
                "a GDB session is already active; call stop_debug_session first"
            ),
            Self::NotActive => write!(f, "no GDB session is active"),
            Self::TargetNotFound(path) => {
                write!(f, "binary not found: {}", path.display())
            }
            Self::ProcessDied => write!(f, "GDB process exited unexpectedly"),
            Self::SessionNotReady => write!(
                f,
                "GDB session is not connected; call start_debug_session first"
            ),
            Self::Transport(msg) => write!(f, "transport failure: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
