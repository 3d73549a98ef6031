//! ndt7 Session Monitor - CLI entry point
//!
//! Locates the measurement client through the process-wide registry, runs
//! one session, and renders the resulting panel.

use clap::Parser;
use ndt7_monitor::{app::App, cli::Cli, error::AppError};
use std::{error::Error, process};

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> ndt7_monitor::Result<()> {
    App::new(cli)?.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Pass --accept-data-policy to allow measurements to run");
            eprintln!("  - Check your .env file format (NDT7_* variables)");
            eprintln!("  - Gate timeout and poll interval are in milliseconds");
        }
        AppError::ClientUnavailable(_) => {
            eprintln!();
            eprintln!("Client availability help:");
            eprintln!("  - The embedding application must install a measurement client");
            eprintln!("  - Increase the wait with --timeout-ms if the client loads slowly");
        }
        AppError::ClientRun(_) => {
            eprintln!();
            eprintln!("Run troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Re-run the test; no retry happens automatically");
        }
        _ => {}
    }
}
