//! ndt7 Session Monitor
//!
//! Drives an external ndt7-style measurement client and renders its
//! progress: the chosen server, live download/upload throughput, latency,
//! and an append-only session log. The measurement protocol, transport, and
//! statistics all live inside the external client; this crate only wires
//! its callbacks to a display panel.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use client::{
    AvailabilityGate, CallbackSet, ClientConfig, ClientMetadata, MeasurementClient, ServerRecord,
};
pub use error::{AppError, Result};
pub use models::Config;
pub use output::{ColoredFormatter, OutputFormatterFactory, PanelFormatter, PlainFormatter};
pub use session::{DisplayState, PanelSnapshot, SessionController, SessionLog, StatusPanel};
pub use types::{SessionOutcome, SessionState};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_CLIENT_NAME: &str = "ndt7-monitor";
    pub const DEFAULT_GATE_TIMEOUT: Duration = Duration::from_millis(10_000);
    pub const DEFAULT_GATE_POLL_INTERVAL: Duration = Duration::from_millis(150);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Placeholder shown in the server region before a server is chosen
    pub const SERVER_PLACEHOLDER: &str = "Not selected";
    /// Placeholder shown in the numeric regions before the first event
    pub const VALUE_PLACEHOLDER: &str = "—";
}
