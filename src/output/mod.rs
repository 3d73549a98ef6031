//! Terminal rendering of the status panel

pub mod colored;
pub mod formatter;

pub use colored::ColoredFormatter;
pub use formatter::{format_mbps, format_ms, MetricFormat, LATENCY, NOT_AVAILABLE, THROUGHPUT};

use crate::session::PanelSnapshot;
use std::fmt::Write as _;

/// Renders the five display regions and the session log
pub trait PanelFormatter {
    /// Render the whole panel; the log shows at most `max_log_lines` entries,
    /// newest first
    fn format_panel(&self, snapshot: &PanelSnapshot, max_log_lines: usize) -> String;

    /// Format an error line
    fn format_error(&self, message: &str) -> String;

    /// Format a success line
    fn format_success(&self, message: &str) -> String;
}

/// Plain text formatter without colors
pub struct PlainFormatter;

impl PanelFormatter for PlainFormatter {
    fn format_panel(&self, snapshot: &PanelSnapshot, max_log_lines: usize) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Measurement session [{}]", snapshot.state.as_str());
        let _ = writeln!(out, "  Server:   {}", snapshot.server);
        let _ = writeln!(out, "  Download: {}", snapshot.download);
        let _ = writeln!(out, "  Upload:   {}", snapshot.upload);
        let _ = writeln!(out, "  Latency:  {}", snapshot.latency);

        if !snapshot.log_lines.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Log (newest first):");
            for line in snapshot.log_lines.iter().take(max_log_lines) {
                let _ = writeln!(out, "  {}", line);
            }
            let hidden = snapshot.log_lines.len().saturating_sub(max_log_lines);
            if hidden > 0 {
                let _ = writeln!(out, "  ... {} earlier entries (use --verbose)", hidden);
            }
        }

        out
    }

    fn format_error(&self, message: &str) -> String {
        format!("Error: {}", message)
    }

    fn format_success(&self, message: &str) -> String {
        message.to_string()
    }
}

/// Factory for creating the appropriate formatter
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color configuration
    pub fn create_formatter(enable_color: bool) -> Box<dyn PanelFormatter> {
        if enable_color {
            Box::new(ColoredFormatter)
        } else {
            Box::new(PlainFormatter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionState;

    fn snapshot() -> PanelSnapshot {
        PanelSnapshot {
            state: SessionState::Completed,
            server: "mlab1-lga03 (New York)".to_string(),
            download: "42.00 Mb/s".to_string(),
            upload: "17.00 Mb/s".to_string(),
            latency: "12.5 ms".to_string(),
            start_enabled: true,
            stop_enabled: false,
            log_lines: vec![
                "[12:00:09] Measurement run completed with exit code 0".to_string(),
                "[12:00:03] Download update: 42.00 Mb/s".to_string(),
                "[12:00:01] Starting measurement session".to_string(),
            ],
        }
    }

    #[test]
    fn test_plain_panel_contains_all_regions() {
        let out = PlainFormatter.format_panel(&snapshot(), usize::MAX);
        assert!(out.contains("Server:   mlab1-lga03 (New York)"));
        assert!(out.contains("Download: 42.00 Mb/s"));
        assert!(out.contains("Upload:   17.00 Mb/s"));
        assert!(out.contains("Latency:  12.5 ms"));
        assert!(out.contains("completed"));
        assert!(out.contains("Log (newest first):"));
    }

    #[test]
    fn test_plain_panel_truncates_log() {
        let out = PlainFormatter.format_panel(&snapshot(), 1);
        assert!(out.contains("exit code 0"));
        assert!(!out.contains("Download update"));
        assert!(out.contains("2 earlier entries"));
    }

    #[test]
    fn test_factory_selects_by_color_flag() {
        // Both variants render the same content; only styling differs
        let plain = OutputFormatterFactory::create_formatter(false);
        let colored = OutputFormatterFactory::create_formatter(true);
        assert!(plain.format_panel(&snapshot(), usize::MAX).contains("42.00 Mb/s"));
        assert!(colored.format_panel(&snapshot(), usize::MAX).contains("42.00 Mb/s"));
    }
}
