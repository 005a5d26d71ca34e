//! Command gate for free-form debugger commands.
//!
//! A denylist of substrings layered under an allowlist of base tokens;
//! both must pass. This is best-effort string matching, not a parser: it
//! will not catch whitespace-split or otherwise encoded metacharacters, so
//! treat it as defense in depth rather than a security boundary.

use std::fmt::{Display, Formatter};

use tracing::{debug, info_span, warn};

use crate::models::policy::AdmissionPolicy;

/// Reason a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Command is blank after trimming.
    Empty,
    /// Base token is not on the allowlist.
    NotWhitelisted(String),
    /// Command contains a forbidden substring.
    DangerousPattern(String),
    /// Command exceeds the length limit.
    TooLong {
        /// Length of the rejected command in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "command is empty"),
            Self::NotWhitelisted(token) => {
                write!(f, "command `{token}` is not allowed")
            }
            Self::DangerousPattern(pattern) => {
                write!(f, "dangerous pattern detected: `{pattern}`")
            }
            Self::TooLong { length, max } => {
                write!(f, "command is too long ({length} > {max} characters)")
            }
        }
    }
}

impl std::error::Error for Rejection {}

/// Validates free-form commands against an [`AdmissionPolicy`].
pub struct CommandGate;

impl CommandGate {
    /// Check `command` against `policy`.
    ///
    /// Evaluation order:
    /// 1. Blank command → [`Rejection::Empty`].
    /// 2. Forbidden substring in the lowercased text →
    ///    [`Rejection::DangerousPattern`].
    /// 3. First whitespace token not admitted → [`Rejection::NotWhitelisted`].
    /// 4. Longer than `policy.max_length` characters → [`Rejection::TooLong`].
    ///
    /// The denylist runs before the allowlist so that `heap; rm -rf /`
    /// reports the injected pattern rather than the mangled `heap;` token.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] encountered.
    pub fn validate(command: &str, policy: &AdmissionPolicy) -> Result<(), Rejection> {
        let _span = info_span!("command_gate").entered();

        // ── 1. Blank ─────────────────────────────────────────
        let Some(base) = command.split_whitespace().next() else {
            return Err(Rejection::Empty);
        };

        // ── 2. Denylist ──────────────────────────────────────
        let lowered = command.to_lowercase();
        if let Some(pattern) = policy
            .forbidden_substrings
            .iter()
            .find(|pattern| lowered.contains(pattern.as_str()))
        {
            warn!(%pattern, "command rejected: dangerous pattern");
            return Err(Rejection::DangerousPattern(pattern.clone()));
        }

        // ── 3. Allowlist ─────────────────────────────────────
        if !policy.admits(base) {
            warn!(base, "command rejected: not whitelisted");
            return Err(Rejection::NotWhitelisted(base.to_owned()));
        }

        // ── 4. Length ────────────────────────────────────────
        let length = command.chars().count();
        if length > policy.max_length {
            warn!(length, max = policy.max_length, "command rejected: too long");
            return Err(Rejection::TooLong {
                length,
                max: policy.max_length,
            });
        }

        debug!(base, "command admitted");
        Ok(())
    }
}
