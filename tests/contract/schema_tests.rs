//! Contract tests verifying tool input schemas.

use pwndbg_mcp::mcp::handler::PwndbgServer;
use serde_json::{json, Value};

fn schema_of(name: &str) -> Value {
    let tool = PwndbgServer::all_tools()
        .into_iter()
        .find(|tool| tool.name == name)
        .unwrap_or_else(|| panic!("tool {name} not published"));
    Value::Object(tool.input_schema.as_ref().clone())
}

#[test]
fn argumentless_tools_take_empty_objects() {
    for name in ["heap", "bins", "vis", "checksec", "regs", "stop_debug_session"] {
        let schema = schema_of(name);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"], json!({}));
        assert!(schema.get("required").is_none());
    }
}

#[test]
fn malloc_chunk_requires_address() {
    let schema = schema_of("malloc_chunk");
    assert_eq!(schema["properties"]["address"]["type"], "string");
    assert_eq!(schema["required"], json!(["address"]));
}

#[test]
fn search_and_find_require_pattern() {
    for name in ["search", "find"] {
        let schema = schema_of(name);
        assert_eq!(schema["properties"]["pattern"]["type"], "string");
        assert_eq!(schema["required"], json!(["pattern"]));
    }
}

#[test]
fn telescope_address_defaults_to_empty() {
    let schema = schema_of("telescope");
    assert_eq!(schema["properties"]["address"]["default"], "");
    assert!(schema.get("required").is_none());
}

#[test]
fn start_debug_session_binary_is_optional() {
    let schema = schema_of("start_debug_session");
    assert_eq!(schema["properties"]["binary_path"]["type"], "string");
    assert!(schema.get("required").is_none());
}

#[test]
fn execute_custom_command_requires_command() {
    let schema = schema_of("execute_custom_command");
    assert_eq!(schema["required"], json!(["command"]));
}
