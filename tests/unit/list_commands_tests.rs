//! Unit tests for the admitted-command listing.

use pwndbg_mcp::models::policy::{AdmissionPolicy, COMMAND_CATEGORIES};
use pwndbg_mcp::mcp::tools::list_commands::render_command_list;

#[test]
fn default_listing_shows_every_category() {
    let text = render_command_list(&AdmissionPolicy::default());
    assert!(text.starts_with("=== Available pwndbg commands ==="));
    for (category, commands) in COMMAND_CATEGORIES {
        assert!(text.contains(&format!("{category}:\n")), "missing {category}");
        for command in *commands {
            assert!(text.contains(&format!("  - {command}\n")), "missing {command}");
        }
    }
    assert!(!text.contains("Other:"));
    assert!(text.contains("execute_custom_command"));
}

#[test]
fn restricted_policy_hides_other_commands() {
    let policy = AdmissionPolicy::new(["heap", "vmmap"], Vec::<String>::new(), 200);
    let text = render_command_list(&policy);
    assert!(text.contains("Heap analysis:\n  - heap\n"));
    assert!(text.contains("Binary security:\n  - vmmap\n"));
    assert!(!text.contains("telescope"));
    assert!(!text.contains("Disassembly:"));
}

#[test]
fn uncategorized_commands_are_grouped_as_other() {
    let policy = AdmissionPolicy::new(["heap", "kbase"], Vec::<String>::new(), 200);
    let text = render_command_list(&policy);
    assert!(text.contains("Other:\n  - kbase\n"));
}
