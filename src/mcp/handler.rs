//! MCP server handler, shared application state, and tool router.

use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::{
    tool::{ToolCallContext, ToolRoute, ToolRouter},
    ServerHandler,
};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use tokio::sync::Mutex;
use tracing::info_span;

use crate::config::GlobalConfig;
use crate::gdb::session::{ProcessSession, SessionSettings};
use crate::models::operation::{ArgSlot, Operation};
use crate::models::policy::AdmissionPolicy;
use crate::mcp::tools::{catalog, custom_command, list_commands, session_control};

/// The single debugger session, serialized behind an async mutex.
///
/// Holding the lock for the duration of a command is what guarantees at
/// most one command is ever in flight against the debugger.
pub type SharedSession = Arc<Mutex<ProcessSession>>;

/// Shared application state accessible by all MCP tool handlers.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Admission policy for free-form and argument-bearing commands.
    pub policy: Arc<AdmissionPolicy>,
    /// The debugger session.
    pub session: SharedSession,
}

impl AppState {
    /// Build state from configuration with a disconnected session.
    #[must_use]
    pub fn new(config: GlobalConfig) -> Self {
        let policy = config.admission_policy();
        let session = ProcessSession::new(SessionSettings::from_config(&config));
        Self {
            config: Arc::new(config),
            policy: Arc::new(policy),
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// MCP server exposing pwndbg commands as tools.
pub struct PwndbgServer {
    state: Arc<AppState>,
}

impl PwndbgServer {
    /// Create a new MCP server bound to shared application state.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Access the shared application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    fn tool_router() -> ToolRouter<Self> {
        let mut router = ToolRouter::new();

        for tool in Self::all_tools() {
            let name = tool.name.to_string();
            if let Some(op) = Operation::from_tool_name(&name) {
                router.add_route(ToolRoute::new_dyn(tool, move |context| {
                    Box::pin(catalog::handle(op, context))
                }));
                continue;
            }
            match name.as_str() {
                "check_pwndbg_connection" => {
                    router.add_route(ToolRoute::new_dyn(tool, |context| {
                        Box::pin(session_control::handle_check(context))
                    }));
                }
                "start_debug_session" => {
                    router.add_route(ToolRoute::new_dyn(tool, |context| {
                        Box::pin(session_control::handle_start(context))
                    }));
                }
                "stop_debug_session" => {
                    router.add_route(ToolRoute::new_dyn(tool, |context| {
                        Box::pin(session_control::handle_stop(context))
                    }));
                }
                "execute_custom_command" => {
                    router.add_route(ToolRoute::new_dyn(tool, |context| {
                        Box::pin(custom_command::handle(context))
                    }));
                }
                "list_available_commands" => {
                    router.add_route(ToolRoute::new_dyn(tool, |context| {
                        Box::pin(std::future::ready(list_commands::handle(&context)))
                    }));
                }
                _ => {
                    router.add_route(ToolRoute::new_dyn(tool, |_context| {
                        Box::pin(async {
                            Err(rmcp::ErrorData::internal_error(
                                "tool not implemented",
                                None,
                            ))
                        })
                    }));
                }
            }
        }

        router
    }

    /// Convert a `serde_json::Value::Object` into the `Arc<Map>` expected by `Tool`.
    fn schema(value: serde_json::Value) -> Arc<serde_json::Map<String, serde_json::Value>> {
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::default()),
        }
    }

    /// Input schema for a catalog operation's argument slot.
    fn operation_schema(slot: ArgSlot) -> serde_json::Value {
        match slot {
            ArgSlot::None => serde_json::json!({ "type": "object", "properties": {} }),
            ArgSlot::Optional(name) => serde_json::json!({
                "type": "object",
                "properties": { name: { "type": "string", "default": "" } }
            }),
            ArgSlot::Required(name) => serde_json::json!({
                "type": "object",
                "properties": { name: { "type": "string" } },
                "required": [name]
            }),
        }
    }

    /// Every tool this server publishes: session control first, then the
    /// operation catalog.
    #[must_use]
    pub fn all_tools() -> Vec<Tool> {
        let mut tools = vec![
            Tool::new(
                "check_pwndbg_connection",
                "Check whether GDB and pwndbg are installed and whether a debug \
                 session is active.",
                Self::schema(serde_json::json!({ "type": "object", "properties": {} })),
            ),
            Tool::new(
                "start_debug_session",
                "Start a GDB debugging session, optionally loading a binary.",
                Self::schema(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "binary_path": { "type": "string", "default": "" }
                    }
                })),
            ),
            Tool::new(
                "stop_debug_session",
                "Stop the active GDB debugging session.",
                Self::schema(serde_json::json!({ "type": "object", "properties": {} })),
            ),
            Tool::new(
                "execute_custom_command",
                "Run an allowlisted pwndbg/GDB command that no dedicated tool \
                 covers. The command is checked against the admission policy first.",
                Self::schema(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "command": { "type": "string" }
                    },
                    "required": ["command"]
                })),
            ),
            Tool::new(
                "list_available_commands",
                "List every pwndbg/GDB command accepted by execute_custom_command.",
                Self::schema(serde_json::json!({ "type": "object", "properties": {} })),
            ),
        ];

        tools.extend(Operation::ALL.into_iter().map(|op| {
            let spec = op.spec();
            Tool::new(
                spec.tool,
                spec.description,
                Self::schema(Self::operation_schema(spec.argument)),
            )
        }));

        tools
    }
}

impl ServerHandler for PwndbgServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = env!("CARGO_PKG_NAME").into();
        info.server_info.version = env!("CARGO_PKG_VERSION").into();
        info.instructions = Some(
            "Drives a pwndbg/GDB session. Call start_debug_session first, then use \
             the analysis tools; call stop_debug_session when done."
                .into(),
        );
        info
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, rmcp::ErrorData>> + Send + '_ {
        let router = Self::tool_router();
        let _span = info_span!("call_tool", tool = %request.name).entered();

        async move {
            router
                .call(ToolCallContext::new(self, request, context))
                .await
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, rmcp::ErrorData>> + Send + '_ {
        let tools = Self::all_tools();

        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }
}
