//! Handler registry domain module.
//!
//! This module is the boundary between the host application and the tool
//! gateway. Host components declare their request-mapped methods here, and
//! the gateway reads them back to build its tool catalog.
//!
//! ## Architecture
//!
//! - `component.rs` - Component and method declarations (builder DSL)
//! - `store.rs` - Concurrency-safe registry table
//! - `schema.rs` - Body field introspection through `schemars`
//! - `type_name.rs` - Simple type names for declared types
//! - `error.rs` - Registry-specific error types

mod component;
mod error;
mod schema;
mod store;
mod type_name;

pub use component::{
    BoundHandler, Component, ComponentBuilder, HandlerMethod, HandlerResult, MethodBuilder,
    MethodParam, ParamKind, RequestMapping, ReturnType, Stereotype, ToolArguments,
};
pub use error::RegistryError;
pub use schema::{BodyFields, BodyFieldsFn, body_fields, render_fields};
pub use store::{HandlerRegistry, RegistrySnapshot};
pub use type_name::simple_type_name;
