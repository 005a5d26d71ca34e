//! Pass-through handlers for the fixed pwndbg operation catalog.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;
use tracing::{info_span, Instrument};

use crate::mcp::handler::{AppState, PwndbgServer};
use crate::mcp::tools::util::{execute_command, rejection_text, text_result};
use crate::models::operation::Operation;
use crate::policy::gate::CommandGate;

/// Run `op` on the shared session and return its rendered output.
///
/// Commands that carry a caller-supplied argument go through the same
/// admission gate as free-form commands.
pub async fn run_operation(state: &AppState, op: Operation, argument: Option<&str>) -> String {
    let command = match op.command(argument) {
        Ok(command) => command,
        Err(missing) => return format!("Error: {missing}"),
    };

    if op.takes_argument() {
        if let Err(rejection) = CommandGate::validate(&command, &state.policy) {
            return rejection_text(&rejection, &state.policy);
        }
    }

    execute_command(state, &command).await
}

/// Handle a catalog tool call.
///
/// # Errors
///
/// Never fails; every outcome is reported as text.
pub async fn handle(
    op: Operation,
    context: ToolCallContext<'_, PwndbgServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let state = Arc::clone(context.service.state());
    let args = context.arguments.unwrap_or_default();
    let spec = op.spec();

    let argument = spec
        .argument
        .name()
        .and_then(|name| args.get(name))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);

    let span = info_span!("operation", tool = spec.tool);
    let text = run_operation(&state, op, argument.as_deref())
        .instrument(span)
        .await;
    Ok(text_result(text))
}
