//! Configuration data model and validation

use crate::client::ClientConfig;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Client name reported to the measurement infrastructure
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Whether the user accepted the measurement data policy. Must be true
    /// for a run to start.
    #[serde(default)]
    pub data_policy_accepted: bool,

    /// Maximum wait for the measurement client to become reachable
    #[serde(default = "default_gate_timeout_ms")]
    pub gate_timeout_ms: u64,

    /// Delay between client reachability probes
    #[serde(default = "default_gate_poll_interval_ms")]
    pub gate_poll_interval_ms: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_name: default_client_name(),
            data_policy_accepted: false,
            gate_timeout_ms: default_gate_timeout_ms(),
            gate_poll_interval_ms: default_gate_poll_interval_ms(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with the data policy accepted; the shape every
    /// runnable configuration has
    pub fn default_accepted() -> Self {
        Self {
            data_policy_accepted: true,
            ..Self::default()
        }
    }

    /// Gate timeout as Duration
    pub fn gate_timeout(&self) -> Duration {
        Duration::from_millis(self.gate_timeout_ms)
    }

    /// Gate poll interval as Duration
    pub fn gate_poll_interval(&self) -> Duration {
        Duration::from_millis(self.gate_poll_interval_ms)
    }

    /// Configuration handed to the measurement client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            data_policy_accepted: self.data_policy_accepted,
            metadata: crate::client::ClientMetadata {
                client_name: self.client_name.clone(),
            },
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.client_name.is_empty() {
            return Err(AppError::config("Client name cannot be empty"));
        }

        if self.client_name.len() > 128 {
            return Err(AppError::config("Client name cannot exceed 128 characters"));
        }

        if !self.data_policy_accepted {
            return Err(AppError::config(
                "The measurement data policy must be accepted (--accept-data-policy)",
            ));
        }

        if self.gate_timeout_ms == 0 {
            return Err(AppError::config("Gate timeout must be greater than 0 ms"));
        }

        if self.gate_timeout_ms > 300_000 {
            return Err(AppError::config("Gate timeout cannot exceed 300000 ms"));
        }

        if self.gate_poll_interval_ms == 0 {
            return Err(AppError::config(
                "Gate poll interval must be greater than 0 ms",
            ));
        }

        if self.gate_poll_interval_ms > self.gate_timeout_ms {
            return Err(AppError::config(
                "Gate poll interval cannot exceed the gate timeout",
            ));
        }

        Ok(())
    }
}

fn default_client_name() -> String {
    crate::defaults::DEFAULT_CLIENT_NAME.to_string()
}

fn default_gate_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_GATE_TIMEOUT.as_millis() as u64
}

fn default_gate_poll_interval_ms() -> u64 {
    crate::defaults::DEFAULT_GATE_POLL_INTERVAL.as_millis() as u64
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.client_name, "ndt7-monitor");
        assert!(!config.data_policy_accepted);
        assert_eq!(config.gate_timeout_ms, 10_000);
        assert_eq!(config.gate_poll_interval_ms, 150);
        assert!(config.enable_color);
    }

    #[test]
    fn test_validate_requires_data_policy() {
        let config = Config::default();
        assert!(config.validate().is_err());
        assert!(Config::default_accepted().validate().is_ok());
    }

    #[test]
    fn test_validate_client_name() {
        let mut config = Config::default_accepted();
        config.client_name = String::new();
        assert!(config.validate().is_err());

        config.client_name = "x".repeat(129);
        assert!(config.validate().is_err());

        config.client_name = "x".repeat(128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_gate_bounds() {
        let mut config = Config::default_accepted();
        config.gate_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.gate_timeout_ms = 300_001;
        assert!(config.validate().is_err());

        config.gate_timeout_ms = 1_000;
        config.gate_poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config.gate_poll_interval_ms = 2_000; // larger than timeout
        assert!(config.validate().is_err());

        config.gate_poll_interval_ms = 150;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_projection() {
        let mut config = Config::default_accepted();
        config.client_name = "my-client".to_string();
        let client_config = config.client_config();
        assert!(client_config.data_policy_accepted);
        assert_eq!(client_config.metadata.client_name, "my-client");
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.gate_timeout_ms, 10_000);
        assert!(!config.data_policy_accepted);
    }
}
