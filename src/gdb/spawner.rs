//! Debugger process spawner.
//!
//! Spawns the debugger with:
//! - quiet startup and confirmation/pagination prompts disabled, since the
//!   framer cannot answer a "yes/no" or "press return" prompt;
//! - stdout and stderr merged into one pipe so diagnostics arrive in order
//!   with regular output;
//! - `kill_on_drop(true)` so a dropped handle never leaves an orphan.

use std::os::fd::OwnedFd;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::BufReader;
use tokio::net::unix::pipe;
use tokio::process::{Child, ChildStdin, Command};
use tracing::info;

use crate::SessionError;

/// Flags appended after the user-supplied arguments, before the target.
const QUIET_FLAG: &str = "-q";

/// `-ex` commands run once the debugger has loaded.
const STARTUP_COMMANDS: &[&str] = &["set confirm off", "set pagination off"];

/// Configuration for spawning the debugger process.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Debugger executable.
    pub debugger: String,
    /// Arguments placed before the fixed startup flags.
    pub debugger_args: Vec<String>,
    /// Optional binary to load.
    pub target: Option<PathBuf>,
}

impl SpawnConfig {
    /// Full argument vector passed to the debugger.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let mut args = self.debugger_args.clone();
        args.push(QUIET_FLAG.to_owned());
        if let Some(ref target) = self.target {
            args.push(target.to_string_lossy().into_owned());
        }
        for command in STARTUP_COMMANDS {
            args.push("-ex".to_owned());
            args.push((*command).to_owned());
        }
        args
    }
}

/// Live debugger process with its two byte pipes.
#[derive(Debug)]
pub struct DebuggerProcess {
    /// Child handle; kept alive so `kill_on_drop` applies.
    pub child: Child,
    /// Debugger's stdin.
    pub stdin: ChildStdin,
    /// Merged stdout+stderr of the debugger.
    pub output: BufReader<pipe::Receiver>,
}

/// Spawn the debugger described by `config`.
///
/// # Errors
///
/// Returns `SessionError::Transport` if the pipe cannot be created or the
/// process fails to spawn.
pub fn spawn_debugger(config: &SpawnConfig) -> Result<DebuggerProcess, SessionError> {
    let (reader, writer) = std::io::pipe()
        .map_err(|err| SessionError::Transport(format!("failed to create output pipe: {err}")))?;
    let stderr_writer = writer
        .try_clone()
        .map_err(|err| SessionError::Transport(format!("failed to clone output pipe: {err}")))?;

    let args = config.arguments();
    let mut child = {
        // The command owns the parent's copies of the write end; it must be
        // dropped before reading so EOF is observed when the child exits.
        let mut cmd = Command::new(&config.debugger);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(writer))
            .stderr(Stdio::from(stderr_writer))
            .kill_on_drop(true);
        cmd.spawn().map_err(|err| {
            SessionError::Transport(format!("failed to spawn {}: {err}", config.debugger))
        })?
    };

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| SessionError::Transport("failed to capture debugger stdin".into()))?;
    let receiver = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))
        .map_err(|err| SessionError::Transport(format!("failed to register output pipe: {err}")))?;

    info!(
        debugger = %config.debugger,
        pid = child.id(),
        ?args,
        "debugger process spawned"
    );

    Ok(DebuggerProcess {
        child,
        stdin,
        output: BufReader::new(receiver),
    })
}
