//! Command-line interface

use clap::Parser;

/// ndt7 session monitor - drives an external measurement client and shows
/// live throughput, latency, and a session log
#[derive(Parser, Debug, Clone)]
#[command(name = "ndt7mon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Accept the measurement data policy (required for a run to start)
    #[arg(long)]
    pub accept_data_policy: bool,

    /// Client name reported to the measurement infrastructure
    #[arg(long)]
    pub client_name: Option<String>,

    /// Maximum wait for the measurement client to become reachable, in milliseconds
    #[arg(short = 't', long, value_name = "MS",
          default_value_t = crate::defaults::DEFAULT_GATE_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Delay between client reachability probes, in milliseconds
    #[arg(long, value_name = "MS",
          default_value_t = crate::defaults::DEFAULT_GATE_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output (full session log)
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(ref name) = self.client_name {
            if name.trim().is_empty() {
                return Err("--client-name cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Automatic color detection: honors NO_COLOR and dumb terminals
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => false,
    }
}
