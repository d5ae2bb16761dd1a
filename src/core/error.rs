//! Error types and handling for the gateway server.
//!
//! This module defines a unified error type that wraps the domain errors and
//! external failures surfaced while starting or running the server.

use thiserror::Error;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the gateway server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tool gateway.
    #[error("Gateway error: {0}")]
    Gateway(#[from] crate::domains::tools::GatewayError),

    /// Error originating from the handler registry.
    #[error("Registry error: {0}")]
    Registry(#[from] crate::domains::registry::RegistryError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::TransportError;
    use crate::domains::registry::RegistryError;

    #[test]
    fn test_domain_errors_convert() {
        let err: Error = TransportError::init("stdin closed").into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(
            err.to_string(),
            "Transport error: Server initialization error: stdin closed"
        );

        let err: Error = RegistryError::unavailable("poisoned").into();
        assert!(matches!(err, Error::Registry(_)));
    }
}
