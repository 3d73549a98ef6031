//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::Config;
use std::path::Path;

/// Names of the recognized environment variables
pub const ENV_CLIENT_NAME: &str = "NDT7_CLIENT_NAME";
pub const ENV_ACCEPT_DATA_POLICY: &str = "NDT7_ACCEPT_DATA_POLICY";
pub const ENV_GATE_TIMEOUT_MS: &str = "NDT7_GATE_TIMEOUT_MS";
pub const ENV_GATE_POLL_INTERVAL_MS: &str = "NDT7_GATE_POLL_INTERVAL_MS";
pub const ENV_ENABLE_COLOR: &str = "NDT7_ENABLE_COLOR";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Merge recognized environment variables into the configuration
    pub fn merge_into(config: &mut Config) -> Result<()> {
        if let Ok(name) = std::env::var(ENV_CLIENT_NAME) {
            if !name.trim().is_empty() {
                config.client_name = name.trim().to_string();
            }
        }

        if let Ok(value) = std::env::var(ENV_ACCEPT_DATA_POLICY) {
            config.data_policy_accepted = parse_bool(ENV_ACCEPT_DATA_POLICY, &value)?;
        }

        if let Ok(value) = std::env::var(ENV_GATE_TIMEOUT_MS) {
            config.gate_timeout_ms = parse_millis(ENV_GATE_TIMEOUT_MS, &value)?;
        }

        if let Ok(value) = std::env::var(ENV_GATE_POLL_INTERVAL_MS) {
            config.gate_poll_interval_ms = parse_millis(ENV_GATE_POLL_INTERVAL_MS, &value)?;
        }

        if let Ok(value) = std::env::var(ENV_ENABLE_COLOR) {
            config.enable_color = parse_bool(ENV_ENABLE_COLOR, &value)?;
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# ndt7-monitor configuration
#
# Values here are defaults; command-line arguments override them.

# Client name reported to the measurement infrastructure
# NDT7_CLIENT_NAME=ndt7-monitor

# Accept the measurement data policy (required for runs to start)
# NDT7_ACCEPT_DATA_POLICY=true

# Maximum wait for the measurement client to become reachable, in ms
# NDT7_GATE_TIMEOUT_MS=10000

# Delay between client reachability probes, in ms
# NDT7_GATE_POLL_INTERVAL_MS=150

# Enable colored output (true/false)
# NDT7_ENABLE_COLOR=true
"#
        .to_string()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::config(format!(
            "Invalid boolean for {}: '{}'",
            key, other
        ))),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| AppError::config(format!("Invalid value for {}: '{}' ({})", key, value, e)))
}
