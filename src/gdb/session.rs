//! Debugger session: owns the child process and its pipes.
//!
//! Exactly one session value exists per server; it is shared behind a
//! mutex so status transitions are never observed interleaved and only
//! one command is ever in flight.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Child;
use tracing::{info, info_span, warn, Instrument};

use crate::config::GlobalConfig;
use crate::gdb::framer::OutputFramer;
use crate::gdb::spawner::{spawn_debugger, DebuggerProcess, SpawnConfig};
use crate::models::framed::{Boundary, FramedResult};
use crate::models::session::SessionStatus;
use crate::SessionError;

/// Grace period between SIGTERM and a hard kill.
const TERMINATE_GRACE: Duration = Duration::from_secs(1);

/// Settings that shape how a session is spawned and framed.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Debugger executable.
    pub debugger: String,
    /// Arguments placed before the fixed startup flags.
    pub debugger_args: Vec<String>,
    /// Prompt sentinel.
    pub prompt: String,
    /// Startup absorption budget.
    pub startup_timeout: Duration,
    /// Per-command framing budget.
    pub command_timeout: Duration,
    /// Line limit per command.
    pub max_output_lines: usize,
}

impl SessionSettings {
    /// Derive session settings from the global configuration.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            debugger: config.debugger.clone(),
            debugger_args: config.debugger_args.clone(),
            prompt: config.prompt.clone(),
            startup_timeout: config.startup_timeout(),
            command_timeout: config.command_timeout(),
            max_output_lines: config.limits.max_output_lines,
        }
    }
}

/// The single binding between this server and one running debugger.
#[derive(Debug)]
pub struct ProcessSession {
    settings: SessionSettings,
    status: SessionStatus,
    process: Option<DebuggerProcess>,
    target: Option<PathBuf>,
}

impl ProcessSession {
    /// Create a disconnected session.
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            status: SessionStatus::Disconnected,
            process: None,
            target: None,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether commands may be issued.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }

    /// Binary loaded by the active session, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// OS process id of the live debugger, if any.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|process| process.child.id())
    }

    /// Framer configured for command output.
    #[must_use]
    pub fn framer(&self) -> OutputFramer {
        OutputFramer::new(self.settings.prompt.clone(), self.settings.max_output_lines)
    }

    /// Spawn the debugger and absorb its banner up to the first prompt.
    ///
    /// A missing prompt at the end of the startup budget is not fatal as
    /// long as the child is still alive.
    ///
    /// # Errors
    ///
    /// - `SessionError::AlreadyActive`: a session is not `Disconnected`;
    ///   nothing is spawned.
    /// - `SessionError::TargetNotFound`: `target` does not exist; nothing
    ///   is spawned.
    /// - `SessionError::Transport`: the process could not be spawned.
    /// - `SessionError::ProcessDied`: the debugger exited during startup.
    pub async fn start(&mut self, target: Option<&Path>) -> Result<(), SessionError> {
        if self.status != SessionStatus::Disconnected {
            return Err(SessionError::AlreadyActive);
        }
        if let Some(path) = target {
            if !path.exists() {
                return Err(SessionError::TargetNotFound(path.to_path_buf()));
            }
        }

        let span = info_span!("session_start", binary = ?target);
        async move {
            self.transition(SessionStatus::Starting);

            let spawn_config = SpawnConfig {
                debugger: self.settings.debugger.clone(),
                debugger_args: self.settings.debugger_args.clone(),
                target: target.map(Path::to_path_buf),
            };
            let mut process = match spawn_debugger(&spawn_config) {
                Ok(process) => process,
                Err(err) => {
                    self.transition(SessionStatus::Disconnected);
                    return Err(err);
                }
            };

            let framer = OutputFramer::startup(self.settings.prompt.clone());
            let stream_closed = match framer
                .read_until_boundary(&mut process.output, self.settings.startup_timeout)
                .await
            {
                Ok(banner) => {
                    if banner.boundary != Boundary::Prompt {
                        warn!(
                            boundary = ?banner.boundary,
                            "prompt not seen during startup"
                        );
                    }
                    banner.boundary == Boundary::EndOfStream
                }
                Err(err) => {
                    warn!(%err, "failed to read startup banner");
                    true
                }
            };

            if stream_closed || has_exited(&mut process.child) {
                terminate(process).await;
                self.transition(SessionStatus::Disconnected);
                return Err(SessionError::ProcessDied);
            }

            self.process = Some(process);
            self.target = target.map(Path::to_path_buf);
            self.transition(SessionStatus::Ready);
            info!(pid = self.pid(), "debugger session ready");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Terminate the debugger and release the handle.
    ///
    /// Termination failures are logged and swallowed; the session always
    /// ends `Disconnected`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` if no session exists.
    pub async fn stop(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Disconnected {
            return Err(SessionError::NotActive);
        }

        self.transition(SessionStatus::Terminating);
        if let Some(process) = self.process.take() {
            terminate(process).await;
        }
        self.target = None;
        self.transition(SessionStatus::Disconnected);
        info!("debugger session stopped");
        Ok(())
    }

    /// Execute `command` with the configured command budget.
    ///
    /// # Errors
    ///
    /// See [`OutputFramer::execute`].
    pub async fn execute(&mut self, command: &str) -> Result<FramedResult, SessionError> {
        let framer = self.framer();
        let budget = self.settings.command_timeout;
        framer.execute(self, command, budget).await
    }

    /// Reset to `Disconnected` if the child has already exited.
    ///
    /// Returns `true` when an exit was detected.
    pub fn reap_if_exited(&mut self) -> bool {
        let Some(process) = self.process.as_mut() else {
            return false;
        };
        if !has_exited(&mut process.child) {
            return false;
        }
        warn!("debugger process exited unexpectedly");
        self.process = None;
        self.target = None;
        self.transition(SessionStatus::Disconnected);
        true
    }

    /// Tear down after the output stream closed or a pipe faulted.
    pub(crate) async fn mark_lost(&mut self) {
        warn!("debugger stream lost; tearing down session");
        if let Some(process) = self.process.take() {
            terminate(process).await;
        }
        self.target = None;
        if self.status != SessionStatus::Disconnected {
            self.transition(SessionStatus::Disconnected);
        }
    }

    /// Mutable access to the live pipes, for the framer only.
    pub(crate) fn process_mut(&mut self) -> Option<&mut DebuggerProcess> {
        self.process.as_mut()
    }

    fn transition(&mut self, next: SessionStatus) {
        if !self.status.can_transition_to(next) {
            warn!(from = %self.status, to = %next, "unexpected session transition");
        }
        info!(from = %self.status, to = %next, "session status changed");
        self.status = next;
    }
}

/// Non-blocking exit check; a failed check counts as still running.
fn has_exited(child: &mut Child) -> bool {
    match child.try_wait() {
        Ok(Some(status)) => {
            info!(?status, "debugger process has exited");
            true
        }
        Ok(None) => false,
        Err(err) => {
            warn!(%err, "failed to poll debugger process status");
            false
        }
    }
}

/// Ask the debugger to exit, escalating to a kill after a grace period.
/// Every failure is logged and swallowed.
async fn terminate(process: DebuggerProcess) {
    let DebuggerProcess {
        mut child,
        stdin,
        output,
    } = process;
    drop(stdin);
    drop(output);

    if let Some(pid) = child.id() {
        request_termination(pid);
    }

    match tokio::time::timeout(TERMINATE_GRACE, child.wait()).await {
        Ok(Ok(status)) => info!(?status, "debugger terminated"),
        Ok(Err(err)) => warn!(%err, "error waiting for debugger exit"),
        Err(_elapsed) => {
            warn!("debugger ignored SIGTERM; killing");
            if let Err(err) = child.kill().await {
                warn!(%err, "failed to kill debugger process");
            }
        }
    }
}

#[cfg(unix)]
fn request_termination(pid: u32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        warn!(pid, "pid out of range for SIGTERM");
        return;
    };
    if let Err(err) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        warn!(pid, %err, "failed to send SIGTERM to debugger");
    }
}

#[cfg(not(unix))]
fn request_termination(_pid: u32) {}
