//! Handler registry error types.

use thiserror::Error;

/// Errors raised while registering or reading components.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry table could not be read or written.
    #[error("Handler registry unavailable: {0}")]
    Unavailable(String),

    /// A component was declared with an empty identifier.
    #[error("Invalid component: {0}")]
    InvalidComponent(String),

    /// Declared metadata for a type could not be read.
    #[error("Cannot introspect type {type_name}: {reason}")]
    Introspection { type_name: String, reason: String },
}

impl RegistryError {
    /// Create a new "unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new "invalid component" error.
    pub fn invalid_component(msg: impl Into<String>) -> Self {
        Self::InvalidComponent(msg.into())
    }

    /// Create a new introspection error.
    pub fn introspection(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Introspection {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}
