//! Session control MCP tool handlers: `check_pwndbg_connection`,
//! `start_debug_session`, and `stop_debug_session`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{info, info_span, warn, Instrument};

use crate::mcp::handler::{AppState, PwndbgServer};
use crate::mcp::tools::util::{parse_args, session_error_text, text_result};
use crate::SessionError;

/// Input parameters for `start_debug_session`.
#[derive(Debug, serde::Deserialize)]
struct StartInput {
    /// Optional binary to load; blank means none.
    #[serde(default)]
    binary_path: Option<String>,
}

/// Locations whose presence suggests pwndbg is installed.
#[must_use]
pub fn pwndbg_markers() -> Vec<PathBuf> {
    let mut markers = Vec::with_capacity(3);
    if let Some(home) = dirs::home_dir() {
        markers.push(home.join(".gdbinit"));
        markers.push(home.join("pwndbg"));
    }
    markers.push(PathBuf::from("/usr/share/pwndbg"));
    markers
}

/// Report debugger availability and session state.
pub async fn check_connection(state: &AppState) -> String {
    let debugger = &state.config.debugger;
    if let Err(err) = which::which(debugger) {
        warn!(%debugger, %err, "debugger not found on PATH");
        return format!("Error: {debugger} is not installed");
    }

    if !pwndbg_markers().iter().any(|path| path.exists()) {
        return "Warning: pwndbg may not be installed".to_owned();
    }

    let session = state.session.lock().await;
    if session.is_ready() {
        match session.target() {
            Some(target) => format!(
                "pwndbg MCP server connected (GDB session active, binary: {})",
                target.display()
            ),
            None => "pwndbg MCP server connected (GDB session active)".to_owned(),
        }
    } else {
        format!(
            "pwndbg available (GDB session inactive, status: {})",
            session.status()
        )
    }
}

/// Start the debugger session, optionally loading `binary_path`.
pub async fn start_session(state: &AppState, binary_path: Option<&str>) -> String {
    let target = binary_path
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(Path::new);

    let mut session = state.session.lock().await;
    match session.start(target).await {
        Ok(()) => {
            info!(binary = ?target, "debug session started");
            match target {
                Some(path) => format!("GDB session started (binary: {})", path.display()),
                None => "GDB session started (no binary)".to_owned(),
            }
        }
        Err(SessionError::Transport(msg)) => format!("Failed to start GDB session: {msg}"),
        Err(err) => session_error_text(&err),
    }
}

/// Stop the debugger session.
pub async fn stop_session(state: &AppState) -> String {
    let mut session = state.session.lock().await;
    match session.stop().await {
        Ok(()) => "GDB session stopped".to_owned(),
        Err(err) => session_error_text(&err),
    }
}

/// Handle the `check_pwndbg_connection` tool call.
///
/// # Errors
///
/// Never fails; every outcome is reported as text.
pub async fn handle_check(
    context: ToolCallContext<'_, PwndbgServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let text = check_connection(&state)
        .instrument(info_span!("check_pwndbg_connection"))
        .await;
    Ok(text_result(text))
}

/// Handle the `start_debug_session` tool call.
///
/// # Errors
///
/// Returns `rmcp::ErrorData::invalid_params` if the arguments are malformed.
pub async fn handle_start(
    context: ToolCallContext<'_, PwndbgServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let input: StartInput = parse_args("start_debug_session", context.arguments)?;

    let span = info_span!(
        "start_debug_session",
        has_binary = input.binary_path.is_some()
    );
    let text = start_session(&state, input.binary_path.as_deref())
        .instrument(span)
        .await;
    Ok(text_result(text))
}

/// Handle the `stop_debug_session` tool call.
///
/// # Errors
///
/// Never fails; every outcome is reported as text.
pub async fn handle_stop(
    context: ToolCallContext<'_, PwndbgServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let text = stop_session(&state)
        .instrument(info_span!("stop_debug_session"))
        .await;
    Ok(text_result(text))
}
