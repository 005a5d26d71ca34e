//! `execute_custom_command` MCP tool handler.
//!
//! Escape hatch for commands without a dedicated tool. The command must
//! pass the admission gate before it reaches the debugger.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{info, info_span, Instrument};

use crate::mcp::handler::{AppState, PwndbgServer};
use crate::mcp::tools::util::{
    parse_args, rejection_text, run_command, session_error_text, text_result,
};
use crate::policy::gate::CommandGate;

/// Input parameters for `execute_custom_command`.
#[derive(Debug, serde::Deserialize)]
struct CustomCommandInput {
    /// Free-form debugger command.
    #[serde(default)]
    command: String,
}

/// Gate and run a free-form command, returning the rendered output.
pub async fn run_custom_command(state: &AppState, command: &str) -> String {
    if let Err(rejection) = CommandGate::validate(command, &state.policy) {
        return rejection_text(&rejection, &state.policy);
    }

    info!(command, "running custom command");
    match run_command(state, command).await {
        Ok(output) => format!("Custom command executed: {command}\n\n{output}"),
        Err(err) => session_error_text(&err),
    }
}

/// Handle the `execute_custom_command` tool call.
///
/// # Errors
///
/// Returns `rmcp::ErrorData::invalid_params` if the arguments are malformed.
pub async fn handle(
    context: ToolCallContext<'_, PwndbgServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let input: CustomCommandInput = parse_args("execute_custom_command", context.arguments)?;

    let span = info_span!("execute_custom_command");
    let text = run_custom_command(&state, &input.command)
        .instrument(span)
        .await;
    Ok(text_result(text))
}
