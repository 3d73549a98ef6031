//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration.
    ///
    /// Precedence, lowest to highest: defaults, .env/environment, CLI flags.
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        EnvManager::merge_into(&mut config)?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if self.cli.accept_data_policy {
            config.data_policy_accepted = true;
        }

        if let Some(ref name) = self.cli.client_name {
            config.client_name = name.trim().to_string();
        }

        if self.cli.timeout_ms != crate::defaults::DEFAULT_GATE_TIMEOUT.as_millis() as u64 {
            config.gate_timeout_ms = self.cli.timeout_ms;
        }

        if self.cli.poll_interval_ms
            != crate::defaults::DEFAULT_GATE_POLL_INTERVAL.as_millis() as u64
        {
            config.gate_poll_interval_ms = self.cli.poll_interval_ms;
        }

        config.enable_color = self.cli.use_colors();
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!(
                "Final config: client_name={}, gate_timeout={}ms, poll_interval={}ms, enable_color={}",
                config.client_name,
                config.gate_timeout_ms,
                config.gate_poll_interval_ms,
                config.enable_color
            );
        }
    }
}

/// Load the complete configuration from CLI arguments and environment
pub fn load_config(cli: Cli) -> Result<Config> {
    cli.validate().map_err(crate::error::AppError::config)?;
    ConfigParser::new(cli).parse()
}
