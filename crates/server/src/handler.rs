//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::vin_history::{VinHistoryParams, history_impl};
use crate::tools::vin_manual_search::{VinManualSearchParams, manual_search_impl};
use crate::tools::vin_resolve::{VinResolveParams, resolve_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use vinlookup_client::ResolutionService;

/// The main MCP server handler for vin-mcp.
#[derive(Clone)]
pub struct VinLookupServer {
    service: Arc<ResolutionService>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl VinLookupServer {
    /// Create a new server handler around a resolution service.
    pub fn new(service: Arc<ResolutionService>) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }

    /// Resolve a VIN, local store first, decoder page on a miss.
    #[tool(description = "Decode a VIN into make, model, model year, engine and fuel type. \
                          Uses the local store first and the public decoder page on a miss.")]
    async fn vin_resolve(&self, params: Parameters<VinResolveParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.service, params.0).await
    }

    /// List previously resolved vehicles.
    #[tool(description = "List previously decoded vehicles, most recently searched first.")]
    async fn vin_history(&self, params: Parameters<VinHistoryParams>) -> Result<CallToolResult, McpError> {
        history_impl(&self.service, params.0).await
    }

    /// Build a service manual search link.
    #[tool(description = "Build a web search link for a vehicle's PDF service manual.")]
    async fn vin_manual_search(&self, params: Parameters<VinManualSearchParams>) -> Result<CallToolResult, McpError> {
        manual_search_impl(&self.service, params.0).await
    }
}

impl ServerHandler for VinLookupServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "vin-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
