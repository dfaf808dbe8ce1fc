//! Configuration
//!
//! Layered configuration for the store connection and logging. Sources, lowest
//! precedence first: built-in defaults, the global config file, an explicit
//! config file, `AMLSTORE__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Default REST root of a local BaseX server
pub const DEFAULT_ADDRESS: &str = "http://localhost:8080/rest/";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmlStoreConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection to the remote store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// REST root address
    #[serde(default = "default_address")]
    pub address: String,

    /// User name passed through to the HTTP client; no credentials when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Request timeout in seconds; the HTTP client default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

impl ServerConfig {
    fn address_has_scheme(address: &str) -> bool {
        address.starts_with("http://") || address.starts_with("https://")
    }

    pub fn address_is_valid(address: &str) -> bool {
        let address = address.trim();
        if !Self::address_has_scheme(address) {
            return false;
        }

        let Some(rest) = address.split_once("://").map(|(_, rest)| rest) else {
            return false;
        };
        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return false;
        }

        let authority = rest.split('/').next().unwrap_or_default();
        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        let host = if host_port.starts_with('[') {
            let Some(end_bracket) = host_port.find(']') else {
                return false;
            };
            &host_port[1..end_bracket]
        } else {
            host_port.split(':').next().unwrap_or_default()
        };

        !host.is_empty()
    }

    /// Validate server configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !Self::address_is_valid(&self.address) {
            return Err(format!("Invalid server address: {}", self.address));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err("Password given without username".to_string());
        }
        if self.timeout_secs == Some(0) {
            return Err("Timeout must be at least one second".to_string());
        }
        Ok(())
    }
}
