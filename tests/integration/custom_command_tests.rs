//! Integration tests for `execute_custom_command` tool logic.

use pwndbg_mcp::mcp::tools::custom_command::run_custom_command;
use pwndbg_mcp::mcp::tools::session_control::{start_session, stop_session};
use serial_test::serial;

use super::test_helpers::{Fixture, ECHO_DEBUGGER};

#[tokio::test]
#[serial]
async fn admitted_command_runs_with_prefix() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();
    start_session(&state, None).await;

    let text = run_custom_command(&state, "info registers rip").await;
    assert_eq!(
        text,
        "Custom command executed: info registers rip\n\nran: info registers rip"
    );

    stop_session(&state).await;
}

#[tokio::test]
#[serial]
async fn injection_is_rejected_before_reaching_debugger() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();
    start_session(&state, None).await;

    let text = run_custom_command(&state, "heap; rm -rf /").await;
    assert!(text.starts_with("Error: dangerous pattern detected"));

    // Nothing leaked into the pipe: the next command sees only its output.
    let text = run_custom_command(&state, "bins").await;
    assert_eq!(text, "Custom command executed: bins\n\nran: bins");

    stop_session(&state).await;
}

#[tokio::test]
#[serial]
async fn unknown_command_lists_alternatives() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();

    let text = run_custom_command(&state, "shell id").await;
    assert!(text.starts_with("Error: command `shell` is not allowed. Available commands: "));
    assert!(text.contains("heap"));
    assert!(text.contains("telescope"));
}

#[tokio::test]
#[serial]
async fn empty_command_is_rejected() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();

    assert_eq!(run_custom_command(&state, "   ").await, "Error: command is empty");
}

#[tokio::test]
#[serial]
async fn overlong_command_is_rejected() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();

    let command = format!("print {}", "7".repeat(250));
    assert_eq!(
        run_custom_command(&state, &command).await,
        "Error: command is too long (256 > 200 characters)"
    );
}

#[tokio::test]
#[serial]
async fn admitted_command_without_session_is_not_ready() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();

    let text = run_custom_command(&state, "vmmap").await;
    assert_eq!(
        text,
        "Error: GDB session is not connected; call start_debug_session first"
    );
}

#[tokio::test]
#[serial]
async fn silent_command_renders_placeholder() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let state = fixture.state();
    start_session(&state, None).await;

    // "quiet" is not admitted, so drive the session directly.
    let mut session = state.session.lock().await;
    let result = session.execute("quiet").await.expect("execute");
    assert_eq!(result.render("quiet"), "Command 'quiet' executed (no output)");
    drop(session);

    stop_session(&state).await;
}
