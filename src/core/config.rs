//! Configuration management for the gateway server.
//!
//! Values come from defaults, overridden by `MCP_*` environment variables
//! (a `.env` file is honored through `dotenvy`).

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default base path of the gateway routes.
pub const DEFAULT_GATEWAY_PATH: &str = "/mcp";

/// Main configuration structure for the gateway server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tool gateway settings.
    pub gateway: GatewayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Tool gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Whether the gateway is exposed at all.
    pub enabled: bool,

    /// Base path of the gateway routes.
    pub path: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_GATEWAY_PATH.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "Route MCP Gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            gateway: GatewayConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `MCP_SERVER_NAME`, `MCP_GATEWAY_ENABLED`,
    /// `MCP_GATEWAY_PATH`, `MCP_LOG_LEVEL`, plus the transport variables read
    /// by [`TransportConfig::from_env`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(enabled) = std::env::var("MCP_GATEWAY_ENABLED") {
            config.gateway.enabled = parse_flag(&enabled).unwrap_or_else(|| {
                warn!("Ignoring invalid MCP_GATEWAY_ENABLED value: {}", enabled);
                true
            });
        }

        if let Ok(path) = std::env::var("MCP_GATEWAY_PATH") {
            config.gateway.path = path;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        config
    }

    /// Check the configuration for values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(Error::config("server name must not be empty"));
        }

        let path = &self.gateway.path;
        if !path.starts_with('/') {
            return Err(Error::config(format!(
                "gateway path must start with '/': {}",
                path
            )));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-');
        if !path.chars().all(allowed) || path.contains("//") {
            return Err(Error::config(format!("malformed gateway path: {}", path)));
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
