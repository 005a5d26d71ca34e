#![forbid(unsafe_code)]

//! `pwndbg-mcp` drives an interactive pwndbg/GDB session in a child
//! process and exposes its commands as MCP tools.

pub mod config;
pub mod errors;
pub mod gdb;
pub mod mcp;
pub mod models;
pub mod policy;

pub use config::GlobalConfig;
pub use errors::{AppError, Result, SessionError};

#[cfg(not(unix))]
compile_error!("pwndbg-mcp drives GDB over Unix pipes and requires a Unix host");
