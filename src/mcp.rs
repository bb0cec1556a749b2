//! MCP JSON-RPC protocol bridge.
//!
//! Exposes the [`Dispatcher`]'s tools through `list_tools` / `call_tool`.
//! The same bridge serves both the stdio transport and the Streamable
//! HTTP endpoint mounted at `/mcp`.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};

use crate::dispatch::Dispatcher;
use crate::tools::ToolInfo;

/// Bridges the dispatcher to the MCP protocol.
///
/// Each MCP session receives a clone; the dispatcher is shared.
#[derive(Clone)]
pub struct McpBridge {
    dispatcher: Dispatcher,
}

impl McpBridge {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    fn to_mcp_tool(info: ToolInfo) -> Tool {
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> = match info.parameters {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: Cow::Owned(info.name),
            title: None,
            description: Some(Cow::Owned(info.description)),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "flight-mcp".to_string(),
                title: Some("Flight MCP".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Flight information tools. Use search_flights to find offers between two \
                 airports, get_airport_info and get_airline_info for reference data, and \
                 get_flight_status for a simulated status report. Current data mode: {}.",
                self.dispatcher.mode()
            )),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .dispatcher
            .tools()
            .into_iter()
            .map(Self::to_mcp_tool)
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.dispatcher
            .tools()
            .into_iter()
            .find(|t| t.name == name)
            .map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.dispatcher.has_tool(&request.name) {
            return Err(McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", request.name),
                None,
            ));
        }

        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let reply = self.dispatcher.call(&request.name, params).await;
        if reply.is_error {
            Ok(CallToolResult::error(vec![Content::text(reply.text)]))
        } else {
            Ok(CallToolResult::success(vec![Content::text(reply.text)]))
        }
    }
}
