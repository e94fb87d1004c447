//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::annotate_text::{AnnotateTextParams, annotate_impl};
use crate::tools::cache::{CachePurgeParams, purge_impl, stats_impl};

use dejure_client::Annotator;
use dejure_core::{AnnotationSettings, CacheDb};
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

/// The main MCP server handler for mcp-dejure.
#[derive(Clone)]
pub struct DejureServer {
    tool_router: ToolRouter<Self>,
    annotator: Annotator,
    cache: CacheDb,
    defaults: AnnotationSettings,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DejureServer {
    /// Create a new server handler.
    ///
    /// `annotator` should share `cache` so the maintenance tools see the same entries.
    pub fn new(annotator: Annotator, cache: CacheDb, defaults: AnnotationSettings) -> Self {
        Self { tool_router: Self::tool_router(), annotator, cache, defaults }
    }

    /// Link legal citations to dejure.org.
    ///
    /// Falls back to the input text whenever the service is unreachable or its answer fails verification.
    #[tool(
        description = "Link legal citations (e.g. '§ 433 BGB', 'Art. 12 GG', '1 BvR 12/05') in text or HTML to dejure.org. Returns the annotated text, or the input unchanged if nothing could be linked safely."
    )]
    async fn annotate_text(&self, params: Parameters<AnnotateTextParams>) -> Result<CallToolResult, McpError> {
        annotate_impl(&self.annotator, &self.defaults, params.0).await
    }

    /// Purge cached annotations.
    #[tool(description = "Delete expired cached annotations, or all of them when 'all' is true. Returns the number deleted.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, params.0).await
    }

    /// Report cache size.
    #[tool(description = "Count cached annotations, total and expired.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.cache).await
    }
}

impl ServerHandler for DejureServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-dejure".into(),
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
