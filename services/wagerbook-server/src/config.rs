//! Server Configuration
//!
//! Configuration management for the Wagerbook server.
//! Supports environment variables, config files, and CLI arguments.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use wagerbook_auth::TokenConfig;

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server binding configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Token authority configuration
    #[serde(default)]
    pub auth: TokenConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable request tracing
    #[serde(default = "default_true")]
    pub enable_tracing: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: default_cors_origins(),
            enable_tracing: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter
    #[serde(default)]
    pub enabled: bool,

    /// Metrics port (separate from main server)
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        // Environment variables with WAGERBOOK__ prefix, e.g. WAGERBOOK__SERVER__PORT
        builder = builder.add_source(
            config::Environment::with_prefix("WAGERBOOK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let server_config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(server_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.token_lifetime, Duration::from_secs(3600));
        assert!(config.auth.signing_key.is_empty());
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_auth_section_reads_humantime_lifetime() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"auth":{"signing_key":"kkkkkkkkkkkkkkkkkkkkkkkkkkkkkkkk","token_lifetime":"15m"}}"#,
        )
        .unwrap();
        assert_eq!(config.auth.token_lifetime, Duration::from_secs(900));
        assert_eq!(config.auth.issuer, "wagerbook");
        assert!(config.auth.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8123,
        };
        assert_eq!(settings.socket_addr().unwrap().port(), 8123);

        let bad = ServerSettings {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_signing_key_redacted_in_debug() {
        let mut config = ServerConfig::default();
        config.auth.signing_key = "super-secret-value".to_string();
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"server":{"port":9001},"auth":{"signing_key":"abc"}}"#)
                .unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.signing_key, "abc");
        assert_eq!(config.logging.format, "pretty");
    }
}
