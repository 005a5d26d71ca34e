//! Unit tests for `SessionStatus` lifecycle transitions.

use pwndbg_mcp::models::session::SessionStatus;

#[test]
fn default_status_is_disconnected() {
    assert_eq!(SessionStatus::default(), SessionStatus::Disconnected);
}

#[test]
fn forward_lifecycle_is_permitted() {
    assert!(SessionStatus::Disconnected.can_transition_to(SessionStatus::Starting));
    assert!(SessionStatus::Starting.can_transition_to(SessionStatus::Ready));
    assert!(SessionStatus::Ready.can_transition_to(SessionStatus::Terminating));
    assert!(SessionStatus::Terminating.can_transition_to(SessionStatus::Disconnected));
}

#[test]
fn live_states_may_drop_to_disconnected() {
    assert!(SessionStatus::Starting.can_transition_to(SessionStatus::Disconnected));
    assert!(SessionStatus::Ready.can_transition_to(SessionStatus::Disconnected));
}

#[test]
fn skipping_startup_is_not_permitted() {
    assert!(!SessionStatus::Disconnected.can_transition_to(SessionStatus::Ready));
    assert!(!SessionStatus::Disconnected.can_transition_to(SessionStatus::Terminating));
    assert!(!SessionStatus::Terminating.can_transition_to(SessionStatus::Ready));
    assert!(!SessionStatus::Ready.can_transition_to(SessionStatus::Starting));
}

#[test]
fn labels_are_lowercase() {
    assert_eq!(SessionStatus::Disconnected.to_string(), "disconnected");
    assert_eq!(SessionStatus::Starting.to_string(), "starting");
    assert_eq!(SessionStatus::Ready.to_string(), "ready");
    assert_eq!(SessionStatus::Terminating.to_string(), "terminating");
}
