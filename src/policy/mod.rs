//! Admission checks for free-form debugger commands.
//!
//! Provides the allowlist/denylist gate applied before a command string
//! reaches the debugger session.

pub mod gate;
