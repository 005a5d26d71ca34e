//! `list_available_commands` MCP tool handler.

use std::collections::BTreeSet;

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::model::CallToolResult;

use crate::mcp::handler::PwndbgServer;
use crate::mcp::tools::util::text_result;
use crate::models::policy::{AdmissionPolicy, COMMAND_CATEGORIES};

/// Render the admitted commands grouped by category.
///
/// Only commands the active policy admits are shown; admitted commands
/// outside the built-in categories are grouped under "Other".
#[must_use]
pub fn render_command_list(policy: &AdmissionPolicy) -> String {
    let mut out = String::from("=== Available pwndbg commands ===\n\n");
    let mut listed: BTreeSet<&str> = BTreeSet::new();

    for (category, commands) in COMMAND_CATEGORIES {
        let admitted: Vec<&str> = commands
            .iter()
            .copied()
            .filter(|command| policy.admits(command))
            .collect();
        listed.extend(admitted.iter().copied());
        push_group(&mut out, category, &admitted);
    }

    let others: Vec<&str> = policy
        .admitted_tokens
        .iter()
        .map(String::as_str)
        .filter(|command| !listed.contains(command))
        .collect();
    push_group(&mut out, "Other", &others);

    out.push_str(
        "Note: execute_custom_command runs any of the commands above directly, \
         but prefer the dedicated tool when one exists.",
    );
    out
}

fn push_group(out: &mut String, category: &str, commands: &[&str]) {
    if commands.is_empty() {
        return;
    }
    out.push_str(category);
    out.push_str(":\n");
    for command in commands {
        out.push_str("  - ");
        out.push_str(command);
        out.push('\n');
    }
    out.push('\n');
}

/// Handle the `list_available_commands` tool call.
///
/// # Errors
///
/// Never fails.
#[allow(clippy::unnecessary_wraps)] // Signature shared with the other tool handlers.
pub fn handle(
    context: &ToolCallContext<'_, PwndbgServer>,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let text = render_command_list(&context.service.state().policy);
    Ok(text_result(text))
}
