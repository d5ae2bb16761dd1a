//! Route MCP Gateway Library
//!
//! Exposes the request handlers of a host application as a catalog of
//! name-addressed tools, over MCP (STDIO or JSON-RPC) and plain HTTP.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **registry**: components and request-mapped methods declared by the host
//!   - **tools**: tool discovery and dispatch over the registry
//!   - **controllers**: demo controllers registered by the binary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use route_mcp_gateway::{Config, McpServer, TransportService};
//! use route_mcp_gateway::domains::{controllers, registry::HandlerRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let registry = Arc::new(HandlerRegistry::new());
//!     controllers::register_all(&registry)?;
//!
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::new(config, registry)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result, TransportService};
pub use domains::registry::{Component, HandlerRegistry};
pub use domains::tools::{Tool, ToolGateway, ToolRequest};
