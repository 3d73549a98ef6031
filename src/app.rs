//! Main application orchestration and execution

use crate::{
    cli::Cli,
    client::registry,
    config::load_config,
    error::Result,
    output::OutputFormatterFactory,
    session::SessionController,
};

/// Log entries shown without --verbose
const DEFAULT_LOG_LINES: usize = 8;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run one measurement session and render the final panel
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli.clone())?;

        if config.debug {
            println!("{} v{}", crate::PKG_NAME, crate::VERSION);
            println!("Debug mode enabled");
            println!("  Client name: {}", config.client_name);
            println!("  Gate timeout: {} ms", config.gate_timeout_ms);
            println!("  Gate poll interval: {} ms", config.gate_poll_interval_ms);
            println!("  Color output: {}", config.enable_color);
            println!();
        }

        let controller = SessionController::new(&config);
        let result = controller.run(registry::locate).await;

        let formatter = OutputFormatterFactory::create_formatter(config.enable_color);
        let max_log_lines = if config.verbose {
            usize::MAX
        } else {
            DEFAULT_LOG_LINES
        };
        println!("{}", formatter.format_panel(&controller.snapshot(), max_log_lines));

        match result {
            Ok(outcome) => {
                println!(
                    "{}",
                    formatter.format_success(&format!(
                        "Session {} finished with exit code {}",
                        outcome.session_id, outcome.exit_code
                    ))
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
