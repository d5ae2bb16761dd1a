//! Tool gateway error types.

use thiserror::Error;

use crate::domains::registry::RegistryError;

/// Errors returned to callers of the tool gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The handler registry could not be traversed.
    #[error("Tool discovery failed: {0}")]
    DiscoveryFailure(String),

    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The requested tool is the gateway's own control surface.
    #[error("{0} cannot be executed")]
    SelfInvocationDenied(String),

    /// Resolving or invoking the tool's handler failed.
    #[error("Error executing tool {tool}: {cause}")]
    ToolExecution {
        tool: String,
        #[source]
        cause: ExecutionCause,
    },
}

/// Underlying reason of a [`GatewayError::ToolExecution`].
#[derive(Debug, Error)]
pub enum ExecutionCause {
    /// The owning component is no longer registered.
    #[error("component '{0}' is not registered")]
    ComponentNotRegistered(String),

    /// The owning component has no method accepting an argument map.
    #[error("method '{method}' on '{component}' does not accept an argument map")]
    NotInvocable { component: String, method: String },

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The handler returned an error.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl GatewayError {
    /// Create a new "tool not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound(name.into())
    }

    /// Create a new "self invocation denied" error.
    pub fn self_invocation(name: impl Into<String>) -> Self {
        Self::SelfInvocationDenied(name.into())
    }

    /// Wrap an execution failure of `tool`.
    pub fn execution(tool: impl Into<String>, cause: impl Into<ExecutionCause>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            cause: cause.into(),
        }
    }

    /// Whether the caller sent a request that can never succeed as is.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ToolNotFound(_) | Self::SelfInvocationDenied(_))
    }

    /// Name of the tool involved, when known.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::ToolNotFound(name) | Self::SelfInvocationDenied(name) => Some(name),
            Self::ToolExecution { tool, .. } => Some(tool),
            Self::DiscoveryFailure(_) => None,
        }
    }
}

impl From<RegistryError> for GatewayError {
    fn from(err: RegistryError) -> Self {
        Self::DiscoveryFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_client_error_classification() {
        assert!(GatewayError::not_found("x").is_client_error());
        assert!(GatewayError::self_invocation("x").is_client_error());
        assert!(!GatewayError::DiscoveryFailure("lock".into()).is_client_error());
        assert!(
            !GatewayError::execution("x", ExecutionCause::Panicked("boom".into()))
                .is_client_error()
        );
    }

    #[test]
    fn test_execution_error_keeps_source() {
        let err = GatewayError::execution("greet", anyhow::anyhow!("database offline"));

        assert_eq!(err.tool_name(), Some("greet"));
        assert_eq!(
            err.to_string(),
            "Error executing tool greet: database offline"
        );
        assert_eq!(err.source().unwrap().to_string(), "database offline");
    }

    #[test]
    fn test_registry_error_is_discovery_failure() {
        let err: GatewayError = RegistryError::unavailable("poisoned").into();
        assert!(matches!(err, GatewayError::DiscoveryFailure(_)));
        assert_eq!(err.tool_name(), None);
    }
}
