//! Unit tests for `CommandGate` admission decisions.

use pwndbg_mcp::models::policy::AdmissionPolicy;
use pwndbg_mcp::policy::gate::{CommandGate, Rejection};

fn policy() -> AdmissionPolicy {
    AdmissionPolicy::default()
}

#[test]
fn admitted_commands_pass() {
    let policy = policy();
    for command in [
        "heap",
        "chunk 0x602010",
        "telescope $rsp 20",
        "search -t string /bin/sh",
        "info registers",
        "break *0x401136",
    ] {
        assert_eq!(
            CommandGate::validate(command, &policy),
            Ok(()),
            "{command} should pass"
        );
    }
}

#[test]
fn format_suffix_is_part_of_base_token() {
    let policy = policy();
    assert_eq!(
        CommandGate::validate("x/16gx 0x7ffe0000", &policy),
        Err(Rejection::NotWhitelisted("x/16gx".into()))
    );
}

#[test]
fn empty_and_blank_are_rejected() {
    let policy = policy();
    assert_eq!(CommandGate::validate("", &policy), Err(Rejection::Empty));
    assert_eq!(CommandGate::validate(" \t\n", &policy), Err(Rejection::Empty));
}

#[test]
fn unknown_base_command_is_rejected() {
    let policy = policy();
    assert_eq!(
        CommandGate::validate("shell ls", &policy),
        Err(Rejection::NotWhitelisted("shell".into()))
    );
}

#[test]
fn base_token_is_case_sensitive() {
    let policy = policy();
    assert_eq!(
        CommandGate::validate("Heap", &policy),
        Err(Rejection::NotWhitelisted("Heap".into()))
    );
}

#[test]
fn injection_after_admitted_command_is_dangerous() {
    let policy = policy();
    let result = CommandGate::validate("heap; rm -rf /", &policy);
    assert!(matches!(result, Err(Rejection::DangerousPattern(_))));
}

#[test]
fn denylist_matches_case_insensitively() {
    let policy = policy();
    assert_eq!(
        CommandGate::validate("info SUDO", &policy),
        Err(Rejection::DangerousPattern("sudo".into()))
    );
}

#[test]
fn shell_metacharacters_are_dangerous() {
    let policy = policy();
    for command in [
        "print $(id)",
        "print `id`",
        "info a && info b",
        "info a || info b",
        "print 1 | cat",
        "print 1 > /tmp/out",
        "print 1 < /tmp/in",
    ] {
        assert!(
            matches!(
                CommandGate::validate(command, &policy),
                Err(Rejection::DangerousPattern(_))
            ),
            "{command} should be rejected"
        );
    }
}

#[test]
fn substring_match_rejects_innocent_words() {
    // "result" contains "su"; the denylist is a plain substring match.
    let policy = policy();
    assert_eq!(
        CommandGate::validate("print result", &policy),
        Err(Rejection::DangerousPattern("su".into()))
    );
}

#[test]
fn spaced_subshell_is_not_caught() {
    let policy = policy();
    assert_eq!(CommandGate::validate("print $ (1)", &policy), Ok(()));
}

#[test]
fn length_limit_counts_characters() {
    let policy = AdmissionPolicy::new(["print"], Vec::<String>::new(), 10);
    assert_eq!(CommandGate::validate("print 1234", &policy), Ok(()));
    assert_eq!(
        CommandGate::validate("print 12345", &policy),
        Err(Rejection::TooLong { length: 11, max: 10 })
    );
    // Multibyte characters count once each.
    assert_eq!(CommandGate::validate("print éééé", &policy), Ok(()));
}

#[test]
fn default_length_limit_is_two_hundred() {
    let policy = policy();
    let long = format!("print {}", "1".repeat(195));
    assert!(matches!(
        CommandGate::validate(&long, &policy),
        Err(Rejection::TooLong { length: 201, max: 200 })
    ));
}

#[test]
fn dangerous_pattern_wins_over_unknown_base() {
    let policy = policy();
    assert!(matches!(
        CommandGate::validate("shell; id", &policy),
        Err(Rejection::DangerousPattern(_))
    ));
}

#[test]
fn rejection_messages_name_the_cause() {
    assert_eq!(Rejection::Empty.to_string(), "command is empty");
    assert_eq!(
        Rejection::NotWhitelisted("shell".into()).to_string(),
        "command `shell` is not allowed"
    );
    assert_eq!(
        Rejection::DangerousPattern("|".into()).to_string(),
        "dangerous pattern detected: `|`"
    );
    assert_eq!(
        Rejection::TooLong { length: 250, max: 200 }.to_string(),
        "command is too long (250 > 200 characters)"
    );
}
