//! MCP tool handlers.
//!
//! Each handler deserializes its arguments, delegates to a plain async
//! function over [`AppState`](crate::mcp::handler::AppState), and always
//! answers with text: session and admission failures are rendered, never
//! raised.

pub mod catalog;
pub mod custom_command;
pub mod list_commands;
pub mod session_control;
pub mod util;
