//! Integration tests for the debugger session lifecycle.

use pwndbg_mcp::models::framed::{truncation_marker, Boundary};
use pwndbg_mcp::models::session::SessionStatus;
use pwndbg_mcp::SessionError;
use serial_test::serial;

use super::test_helpers::{Fixture, CHATTY_DEBUGGER, DYING_DEBUGGER, ECHO_DEBUGGER};

#[tokio::test]
#[serial]
async fn execute_before_start_is_not_ready() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    let result = session.execute("heap").await;
    assert_eq!(result, Err(SessionError::SessionNotReady));
    assert_eq!(session.status(), SessionStatus::Disconnected);
}

#[tokio::test]
#[serial]
async fn start_execute_stop() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    session.start(None).await.expect("start");
    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(session.pid().is_some());
    assert!(session.target().is_none());

    let result = session.execute("vmmap").await.expect("execute");
    assert_eq!(result.boundary, Boundary::Prompt);
    assert_eq!(result.lines, vec!["ran: vmmap"]);

    // Consecutive commands see only their own output.
    let result = session.execute("context").await.expect("execute");
    assert_eq!(result.lines, vec!["ran: context"]);

    session.stop().await.expect("stop");
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.pid().is_none());
}

#[tokio::test]
#[serial]
async fn start_records_target() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    session.start(Some(fixture.target.as_path())).await.expect("start");
    assert_eq!(session.target(), Some(fixture.target.as_path()));

    session.stop().await.expect("stop");
    assert!(session.target().is_none());
}

#[tokio::test]
#[serial]
async fn second_start_keeps_existing_process() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    session.start(None).await.expect("start");
    let pid = session.pid();

    let again = session.start(None).await;
    assert_eq!(again, Err(SessionError::AlreadyActive));
    assert_eq!(session.pid(), pid);
    assert!(session.is_ready());

    session.stop().await.expect("stop");
}

#[tokio::test]
#[serial]
async fn second_stop_is_not_active() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    session.start(None).await.expect("start");
    session.stop().await.expect("stop");
    assert_eq!(session.stop().await, Err(SessionError::NotActive));
}

#[tokio::test]
#[serial]
async fn missing_target_spawns_nothing() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    let missing = fixture.dir.path().join("does-not-exist");
    let result = session.start(Some(missing.as_path())).await;
    assert_eq!(result, Err(SessionError::TargetNotFound(missing)));
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.pid().is_none());
}

#[tokio::test]
#[serial]
async fn debugger_dying_at_startup_is_reported() {
    let fixture = Fixture::new(DYING_DEBUGGER);
    let mut session = fixture.session();

    let result = session.start(None).await;
    assert_eq!(result, Err(SessionError::ProcessDied));
    assert_eq!(session.status(), SessionStatus::Disconnected);

    // The session can be started again afterwards.
    let result = session.start(None).await;
    assert_eq!(result, Err(SessionError::ProcessDied));
}

#[tokio::test]
#[serial]
async fn silent_command_has_no_lines() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();
    session.start(None).await.expect("start");

    let result = session.execute("quiet").await.expect("execute");
    assert_eq!(result.boundary, Boundary::Prompt);
    assert!(result.is_empty());
    assert_eq!(result.render("quiet"), "Command 'quiet' executed (no output)");

    session.stop().await.expect("stop");
}

#[tokio::test]
#[serial]
async fn long_output_is_truncated() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();
    session.start(None).await.expect("start");

    let result = session.execute("flood").await.expect("execute");
    assert_eq!(result.boundary, Boundary::Truncated);
    assert_eq!(result.lines.len(), 201);
    assert_eq!(result.lines[200], truncation_marker(200));

    session.stop().await.expect("stop");
}

#[tokio::test]
#[serial]
async fn debugger_exit_during_command_disconnects() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();
    session.start(None).await.expect("start");

    let result = session.execute("quit").await.expect("execute");
    assert_eq!(result.boundary, Boundary::EndOfStream);
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.pid().is_none());

    assert_eq!(
        session.execute("heap").await,
        Err(SessionError::SessionNotReady)
    );
    assert_eq!(session.stop().await, Err(SessionError::NotActive));
}

#[tokio::test]
#[serial]
async fn session_restarts_after_stop() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();

    session.start(None).await.expect("first start");
    let first = session.pid();
    session.stop().await.expect("first stop");

    session.start(None).await.expect("second start");
    assert!(session.pid().is_some());
    assert_ne!(session.pid(), first);
    let result = session.execute("bins").await.expect("execute");
    assert_eq!(result.lines, vec!["ran: bins"]);

    session.stop().await.expect("second stop");
}

#[tokio::test]
#[serial]
async fn output_at_the_limit_keeps_session_in_step() {
    let fixture = Fixture::new(ECHO_DEBUGGER);
    let mut session = fixture.session();
    session.start(None).await.expect("start");

    let result = session.execute("exact").await.expect("execute");
    assert_eq!(result.boundary, Boundary::Prompt);
    assert_eq!(result.lines.len(), 200);
    assert_eq!(result.lines[199], "row 199");

    let result = session.execute("heap").await.expect("execute");
    assert_eq!(result.lines, vec!["ran: heap"]);

    session.stop().await.expect("stop");
}

#[tokio::test]
#[serial]
async fn long_banner_is_fully_absorbed() {
    let fixture = Fixture::new(CHATTY_DEBUGGER);
    let mut session = fixture.session();
    session.start(None).await.expect("start");

    let result = session.execute("vmmap").await.expect("execute");
    assert_eq!(result.boundary, Boundary::Prompt);
    assert_eq!(result.lines, vec!["ran: vmmap"]);

    session.stop().await.expect("stop");
}
