//! Debugger child-process plumbing.
//!
//! - [`spawner`] launches the debugger with a fixed invocation and a single
//!   merged stdout+stderr pipe.
//! - [`framer`] writes one command and reconstructs its output from the
//!   byte stream, using the prompt sentinel and a wall-clock budget as the
//!   framing boundary.
//! - [`session`] owns the child and its pipes and drives the lifecycle
//!   state machine.

pub mod framer;
pub mod session;
pub mod spawner;
