//! Gateway endpoint - the gateway's own control surface.
//!
//! The endpoint is registered in the handler registry like any other
//! controller so that the host sees its routes, but the scanner recognizes it
//! by type and never turns its methods into tools.

use serde_json::Value;
use std::sync::Arc;

use super::model::{Tool, ToolRequest};
use crate::domains::registry::{Component, simple_type_name};

/// The `/tools` and `/execute` control routes under a base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    base_path: String,
}

impl GatewayEndpoint {
    /// Identifier the endpoint is registered under.
    pub const COMPONENT_ID: &'static str = "gatewayEndpoint";

    /// Create an endpoint rooted at `base_path`.
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_end_matches('/');
        let base_path = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self { base_path }
    }

    /// Simple type name, one of the names callers may not invoke.
    pub fn type_name() -> String {
        simple_type_name::<Self>()
    }

    /// Normalized base path, without trailing slash. Empty string means `/`.
    pub fn base_path(&self) -> &str {
        if self.base_path == "/" {
            ""
        } else {
            &self.base_path
        }
    }

    /// Path of the JSON-RPC endpoint.
    pub fn rpc_path(&self) -> String {
        if self.base_path().is_empty() {
            "/".to_string()
        } else {
            self.base_path.clone()
        }
    }

    /// Path of the tool listing route.
    pub fn tools_path(&self) -> String {
        format!("{}/tools", self.base_path())
    }

    /// Path of the tool execution route.
    pub fn execute_path(&self) -> String {
        format!("{}/execute", self.base_path())
    }

    /// Registry declaration of the control routes.
    ///
    /// No method gets an argument-map invoker, so even a misconfigured scan
    /// could never dispatch back into the gateway.
    pub fn component(self: &Arc<Self>) -> Component {
        Component::rest_controller(Self::COMPONENT_ID, Arc::clone(self))
            .get("listTools", |m| m.response_body::<Vec<Tool>>())
            .post("executeTool", |m| {
                m.body::<ToolRequest>("request").response_body::<Value>()
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let endpoint = GatewayEndpoint::new("/mcp");
        assert_eq!(endpoint.base_path(), "/mcp");
        assert_eq!(endpoint.rpc_path(), "/mcp");
        assert_eq!(endpoint.tools_path(), "/mcp/tools");
        assert_eq!(endpoint.execute_path(), "/mcp/execute");
    }

    #[test]
    fn test_paths_are_normalized() {
        assert_eq!(GatewayEndpoint::new("api/tools/").base_path(), "/api/tools");

        let root = GatewayEndpoint::new("/");
        assert_eq!(root.base_path(), "");
        assert_eq!(root.rpc_path(), "/");
        assert_eq!(root.tools_path(), "/tools");
    }

    #[test]
    fn test_component_declares_control_routes() {
        let component = Arc::new(GatewayEndpoint::new("/mcp")).component();
        assert!(component.is::<GatewayEndpoint>());
        assert_eq!(component.id(), GatewayEndpoint::COMPONENT_ID);

        let idents: Vec<_> = component.methods().iter().map(|m| m.ident()).collect();
        assert_eq!(idents, vec!["listTools", "executeTool"]);
        assert!(component.methods().iter().all(|m| !m.accepts_arguments()));
        assert_eq!(GatewayEndpoint::type_name(), "GatewayEndpoint");
    }
}
