//! Shared utilities for MCP tool handlers.

use rmcp::model::{CallToolResult, Content};
use serde::de::DeserializeOwned;

use crate::mcp::handler::AppState;
use crate::models::policy::AdmissionPolicy;
use crate::policy::gate::Rejection;
use crate::SessionError;

/// Wrap plain text as a successful tool result.
#[must_use]
pub fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Deserialize tool arguments into `T`, treating absent arguments as `{}`.
///
/// # Errors
///
/// Returns `rmcp::ErrorData::invalid_params` if the arguments do not match.
pub fn parse_args<T: DeserializeOwned>(
    tool: &str,
    arguments: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<T, rmcp::ErrorData> {
    let args = arguments.unwrap_or_default();
    serde_json::from_value(serde_json::Value::Object(args)).map_err(|err| {
        rmcp::ErrorData::invalid_params(format!("invalid {tool} parameters: {err}"), None)
    })
}

/// Render a gate rejection for the caller.
///
/// A non-whitelisted command also lists what is accepted.
#[must_use]
pub fn rejection_text(rejection: &Rejection, policy: &AdmissionPolicy) -> String {
    match rejection {
        Rejection::NotWhitelisted(_) => {
            let available: Vec<&str> = policy.admitted_tokens.iter().map(String::as_str).collect();
            format!(
                "Error: {rejection}. Available commands: {}",
                available.join(", ")
            )
        }
        _ => format!("Error: {rejection}"),
    }
}

/// Render a session failure for the caller.
#[must_use]
pub fn session_error_text(err: &SessionError) -> String {
    match err {
        SessionError::Transport(_) => format!("Command execution failed: {err}"),
        _ => format!("Error: {err}"),
    }
}

/// Run `command` on the shared session and render its output.
///
/// # Errors
///
/// Returns the session failure unrendered; see [`session_error_text`].
pub async fn run_command(state: &AppState, command: &str) -> Result<String, SessionError> {
    let mut session = state.session.lock().await;
    let result = session.execute(command).await?;
    Ok(result.render(command))
}

/// Run `command` on the shared session and render the outcome as text.
pub async fn execute_command(state: &AppState, command: &str) -> String {
    run_command(state, command)
        .await
        .unwrap_or_else(|err| session_error_text(&err))
}
