//! Tools domain module.
//!
//! This module turns the request-mapped methods of registered components
//! into a name-addressed tool catalog and dispatches tool calls back to them.
//!
//! ## Architecture
//!
//! - `scanner.rs` - Finds tool candidates in a registry snapshot
//! - `catalog.rs` - Builds tool records and the catalog snapshot
//! - `gateway.rs` - Lists and executes tools by name
//! - `endpoint.rs` - The gateway's own control routes (never a tool)
//! - `model.rs` - Tool and ToolRequest records
//! - `error.rs` - Gateway error types
//!
//! ## Exposing a New Tool
//!
//! Declare the method on a component and register it with the
//! `HandlerRegistry` (see `domains/controllers/`). The catalog picks it up on
//! the next call; nothing in this module needs to change.

mod catalog;
mod endpoint;
mod error;
mod gateway;
mod model;
mod scanner;

pub use catalog::{Catalog, build_tool};
pub use endpoint::GatewayEndpoint;
pub use error::{ExecutionCause, GatewayError};
pub use gateway::ToolGateway;
pub use model::{DEFAULT_RESPONSE_TYPE, OwnerRef, REQUEST_BODY_KEY, Tool, ToolRequest};
pub use scanner::{DiscoveredHandler, scan};
