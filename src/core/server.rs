//! MCP Server implementation and lifecycle management.
//!
//! The server owns the [`ToolGateway`] and exposes it two ways: as an rmcp
//! `ServerHandler` for MCP clients, and through plain methods used by the
//! HTTP transport.
//!
//! ## Tool Architecture
//!
//! Tools are not declared here. The host registers its controllers with a
//! [`HandlerRegistry`] and the gateway derives the catalog from it, so
//! **adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::registry::{HandlerRegistry, ToolArguments};
use crate::domains::tools::{GatewayEndpoint, GatewayError, Tool, ToolGateway, ToolRequest};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool discovery and dispatch.
    gateway: Arc<ToolGateway>,
}

impl McpServer {
    /// Create a new server over `registry`.
    ///
    /// The configuration is validated first; the gateway endpoint is then
    /// registered under the configured base path.
    pub fn new(config: Config, registry: Arc<HandlerRegistry>) -> Result<Self> {
        config.validate()?;

        let gateway = ToolGateway::new(registry, GatewayEndpoint::new(&config.gateway.path))?;
        if !config.gateway.enabled {
            warn!("Tool gateway is disabled; no tools will be exposed");
        }

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Whether the tool gateway is exposed.
    pub fn gateway_enabled(&self) -> bool {
        self.config.gateway.enabled
    }

    /// The gateway's control endpoint.
    pub fn endpoint(&self) -> &GatewayEndpoint {
        self.gateway.endpoint()
    }

    /// Instructions sent to MCP clients on initialization.
    pub fn instructions(&self) -> String {
        format!(
            "{} exposes the host application's request handlers as tools. \
             Call tools/list to discover them.",
            self.name()
        )
    }

    // ========================================================================
    // Gateway access
    // ========================================================================

    /// List all available tools. Empty when the gateway is disabled.
    pub fn list_tools(&self) -> std::result::Result<Vec<Tool>, GatewayError> {
        if !self.gateway_enabled() {
            return Ok(Vec::new());
        }
        self.gateway.list_tools()
    }

    /// Execute a tool and return the handler's raw value.
    pub async fn execute_tool(
        &self,
        request: ToolRequest,
    ) -> std::result::Result<Value, GatewayError> {
        self.gateway.execute_tool(request).await
    }

    /// List all available tools in MCP form.
    pub fn mcp_tools(&self) -> std::result::Result<Vec<rmcp::model::Tool>, McpError> {
        let tools = self
            .list_tools()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(tools
            .iter()
            .map(|tool| {
                rmcp::model::Tool::new(
                    tool.name.clone(),
                    tool.description.clone(),
                    Arc::new(tool.input_schema()),
                )
            })
            .collect())
    }

    /// Call a tool on behalf of an MCP client.
    ///
    /// Handler failures become an error tool result so the client sees the
    /// message; malformed requests are protocol errors.
    pub async fn call_mcp_tool(
        &self,
        name: &str,
        arguments: ToolArguments,
    ) -> std::result::Result<CallToolResult, McpError> {
        if !self.gateway_enabled() {
            return Err(McpError::invalid_request("Tool gateway is disabled", None));
        }

        match self.execute_tool(ToolRequest::new(name, arguments)).await {
            Ok(value) => Ok(CallToolResult::success(vec![Content::text(value_text(
                &value,
            ))])),
            Err(e @ GatewayError::ToolExecution { .. }) => {
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
            Err(e) if e.is_client_error() => Err(McpError::invalid_params(e.to_string(), None)),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }
}

/// Text content of a tool result: strings verbatim, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let capabilities = if self.gateway_enabled() {
            ServerCapabilities::builder().enable_tools().build()
        } else {
            ServerCapabilities::default()
        };

        let mut info = ServerInfo {
            instructions: Some(self.instructions()),
            capabilities,
            ..Default::default()
        };
        info.server_info.name = self.name().to_string();
        info.server_info.version = self.version().to_string();
        info
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.mcp_tools()?,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool");
        self.call_mcp_tool(&request.name, request.arguments.unwrap_or_default())
            .await
    }
}
