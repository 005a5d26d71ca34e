//! Admission policy model for free-form debugger commands.

use std::collections::BTreeSet;

/// Admitted base commands grouped by purpose.
///
/// The flattened set is the default allowlist; the grouping drives
/// `list_available_commands`.
pub const COMMAND_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Heap analysis",
        &[
            "heap",
            "bins",
            "vis_heap_chunks",
            "chunk",
            "fastbins",
            "smallbins",
            "largebins",
            "unsortedbin",
            "tcache",
            "arena",
        ],
    ),
    (
        "Binary security",
        &["checksec", "vmmap", "canary", "piebase", "procinfo"],
    ),
    (
        "Registers / memory",
        &[
            "registers",
            "regs",
            "stack",
            "telescope",
            "context",
            "hexdump",
        ],
    ),
    (
        "Search / analysis",
        &["search", "find", "got", "plt", "rop", "ropper", "strings"],
    ),
    (
        "Disassembly",
        &["disasm", "disassemble", "nearpc", "pdisass"],
    ),
    (
        "Execution control",
        &["break", "continue", "step", "next", "finish", "run"],
    ),
    (
        "Core GDB",
        &[
            "info",
            "print",
            "x",
            "examine",
            "backtrace",
            "bt",
            "frame",
            "set",
            "show",
            "list",
            "file",
            "load",
        ],
    ),
];

/// Substrings that reject a command outright, matched against its
/// lowercased text.
pub const DEFAULT_FORBIDDEN_PATTERNS: &[&str] = &[
    "rm",
    "del",
    "format",
    "mkfs",
    "dd if=",
    "dd of=",
    "sudo",
    "su",
    "chmod +x",
    "wget",
    "curl",
    "nc ",
    "netcat",
    "python -c",
    "perl -e",
    "ruby -e",
    "bash -c",
    "sh -c",
    "$(",
    "`",
    "&&",
    "||",
    ";",
    "|",
    ">",
    ">>",
    "<",
];

/// Default maximum command length in characters.
pub const DEFAULT_MAX_COMMAND_LENGTH: usize = 200;

/// Allowlist of base tokens layered over a denylist of substrings.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Base commands accepted as the first whitespace-separated token.
    pub admitted_tokens: BTreeSet<String>,
    /// Substrings that must not appear in the lowercased command.
    pub forbidden_substrings: Vec<String>,
    /// Maximum command length in characters.
    pub max_length: usize,
}

impl AdmissionPolicy {
    /// Build a policy from explicit lists.
    #[must_use]
    pub fn new<A, F>(admitted: A, forbidden: F, max_length: usize) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            admitted_tokens: admitted.into_iter().map(Into::into).collect(),
            forbidden_substrings: forbidden.into_iter().map(Into::into).collect(),
            max_length,
        }
    }

    /// Whether `token` is an admitted base command (case-sensitive).
    #[must_use]
    pub fn admits(&self, token: &str) -> bool {
        self.admitted_tokens.contains(token)
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::new(
            COMMAND_CATEGORIES
                .iter()
                .flat_map(|(_, commands)| commands.iter().copied()),
            DEFAULT_FORBIDDEN_PATTERNS.iter().copied(),
            DEFAULT_MAX_COMMAND_LENGTH,
        )
    }
}
