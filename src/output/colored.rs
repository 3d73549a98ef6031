//! Colored terminal output

use crate::session::PanelSnapshot;
use crate::types::SessionState;
use colored::Colorize;
use std::fmt::Write as _;

/// Formatter with ANSI colors for interactive terminals
pub struct ColoredFormatter;

impl ColoredFormatter {
    fn state_label(state: SessionState) -> String {
        let label = state.as_str();
        match state {
            SessionState::Completed => label.green().bold().to_string(),
            SessionState::Failed => label.red().bold().to_string(),
            SessionState::Running | SessionState::Starting => label.yellow().to_string(),
            SessionState::Idle => label.dimmed().to_string(),
        }
    }
}

impl super::PanelFormatter for ColoredFormatter {
    fn format_panel(&self, snapshot: &PanelSnapshot, max_log_lines: usize) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} [{}]",
            "Measurement session".bold(),
            Self::state_label(snapshot.state)
        );
        let _ = writeln!(out, "  {} {}", "Server:  ".cyan(), snapshot.server.bold());
        let _ = writeln!(out, "  {} {}", "Download:".cyan(), snapshot.download.bold());
        let _ = writeln!(out, "  {} {}", "Upload:  ".cyan(), snapshot.upload.bold());
        let _ = writeln!(out, "  {} {}", "Latency: ".cyan(), snapshot.latency.bold());

        if !snapshot.log_lines.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", "Log (newest first):".bold());
            for line in snapshot.log_lines.iter().take(max_log_lines) {
                // "[HH:MM:SS] message": dim the timestamp prefix
                match line.split_once("] ") {
                    Some((stamp, message)) => {
                        let _ = writeln!(out, "  {}{} {}", stamp.dimmed(), "]".dimmed(), message);
                    }
                    None => {
                        let _ = writeln!(out, "  {}", line);
                    }
                }
            }
            let hidden = snapshot.log_lines.len().saturating_sub(max_log_lines);
            if hidden > 0 {
                let _ = writeln!(
                    out,
                    "  {}",
                    format!("... {} earlier entries (use --verbose)", hidden).dimmed()
                );
            }
        }

        out
    }

    fn format_error(&self, message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn format_success(&self, message: &str) -> String {
        message.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PanelFormatter;

    #[test]
    fn test_colored_panel_keeps_values_intact() {
        let snapshot = PanelSnapshot {
            state: SessionState::Failed,
            server: "Not selected".to_string(),
            download: "—".to_string(),
            upload: "—".to_string(),
            latency: "—".to_string(),
            start_enabled: true,
            stop_enabled: false,
            log_lines: vec!["[00:00:01] Measurement client unavailable: timeout".to_string()],
        };

        let out = ColoredFormatter.format_panel(&snapshot, usize::MAX);
        assert!(out.contains("Not selected"));
        assert!(out.contains("Measurement client unavailable"));
    }

    #[test]
    fn test_error_line_mentions_message() {
        let out = ColoredFormatter.format_error("gate timed out");
        assert!(out.contains("gate timed out"));
    }
}
