//! Session lifecycle and display state
//!
//! One controller owns one session at a time: it resets the panel, waits for
//! the measurement client through the availability gate, registers the
//! callback set, awaits the client's run, and restores control enablement on
//! every exit path. Data flows one way only: event, extracted value,
//! formatted string, display slot. Nothing here reads the display back.

use crate::{
    client::{AvailabilityGate, CallbackSet, ClientConfig, MeasurementClient, ServerRecord},
    error::{AppError, Result},
    extract,
    models::Config,
    output::formatter::{format_mbps, format_ms},
    types::{Direction, SessionOutcome, SessionState},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// The four display regions fed by measurement events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub server: String,
    pub download: String,
    pub upload: String,
    pub latency: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            server: crate::defaults::SERVER_PLACEHOLDER.to_string(),
            download: crate::defaults::VALUE_PLACEHOLDER.to_string(),
            upload: crate::defaults::VALUE_PLACEHOLDER.to_string(),
            latency: crate::defaults::VALUE_PLACEHOLDER.to_string(),
        }
    }
}

impl DisplayState {
    /// Return every region to its placeholder
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Enablement of the two user controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            start_enabled: true,
            stop_enabled: false,
        }
    }
}

/// One timestamped log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    /// Render as `[HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Append-only session log, rendered newest-first (scrolling log)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    /// Append a message stamped with the current wall-clock time
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            message: message.into(),
        });
    }

    /// Drop all entries (done once, at session start)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Rendered lines, most recent entry first
    pub fn lines_newest_first(&self) -> Vec<String> {
        self.entries.iter().rev().map(LogEntry::render).collect()
    }

    /// Message of the most recent entry, if any
    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(|e| e.message.as_str())
    }
}

/// Everything the page shows: display regions, control enablement, log,
/// and the current lifecycle state
#[derive(Debug, Default)]
pub struct StatusPanel {
    state: SessionState,
    display: DisplayState,
    controls: Controls,
    log: SessionLog,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayState {
        &mut self.display
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Append a log entry
    pub fn push_log<S: Into<String>>(&mut self, message: S) {
        self.log.push(message);
    }

    /// Side effects of the Idle to Starting transition: start disabled, stop
    /// enabled, display and log reset
    pub fn begin(&mut self) {
        self.controls.start_enabled = false;
        self.controls.stop_enabled = true;
        self.display.reset();
        self.log.clear();
        self.state = SessionState::Starting;
    }

    /// Return controls to their pre-start enablement and settle in Idle.
    /// Runs on every session exit path.
    pub fn restore_controls(&mut self) {
        self.controls.start_enabled = true;
        self.controls.stop_enabled = false;
        self.state = SessionState::Idle;
    }

    /// Immutable copy for rendering
    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            state: self.state,
            server: self.display.server.clone(),
            download: self.display.download.clone(),
            upload: self.display.upload.clone(),
            latency: self.display.latency.clone(),
            start_enabled: self.controls.start_enabled,
            stop_enabled: self.controls.stop_enabled,
            log_lines: self.log.lines_newest_first(),
        }
    }
}

/// Point-in-time copy of the panel for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub state: SessionState,
    pub server: String,
    pub download: String,
    pub upload: String,
    pub latency: String,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    /// Rendered log lines, newest first
    pub log_lines: Vec<String>,
}

/// Shared handle to the panel, safe under any callback interleaving
pub type SharedPanel = Arc<Mutex<StatusPanel>>;

/// Lock the panel, recovering from poisoning. Panel mutations are idempotent
/// string assignment and log appends, so a poisoned lock carries no torn
/// state worth failing over.
fn lock(panel: &SharedPanel) -> MutexGuard<'_, StatusPanel> {
    panel.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores control enablement when dropped, so every exit path of a run,
/// including a panic inside the client's start call, resets the controls.
struct ControlRestore {
    panel: SharedPanel,
}

impl Drop for ControlRestore {
    fn drop(&mut self) {
        lock(&self.panel).restore_controls();
    }
}

/// Owns the lifecycle of measurement sessions: start, callback registration,
/// run to completion, control enablement, and the append-only log
pub struct SessionController {
    panel: SharedPanel,
    gate: AvailabilityGate,
    client_config: ClientConfig,
}

impl SessionController {
    pub fn new(config: &Config) -> Self {
        Self {
            panel: Arc::new(Mutex::new(StatusPanel::new())),
            gate: AvailabilityGate::new(config.gate_timeout(), config.gate_poll_interval()),
            client_config: config.client_config(),
        }
    }

    /// Shared handle to the panel this controller mutates
    pub fn panel(&self) -> SharedPanel {
        self.panel.clone()
    }

    /// Copy of the panel for rendering
    pub fn snapshot(&self) -> PanelSnapshot {
        lock(&self.panel).snapshot()
    }

    /// Run one measurement session to completion.
    ///
    /// `locate` is probed by the availability gate until the external client
    /// is reachable or the gate times out. At most one session is active at
    /// a time; a second concurrent start is rejected.
    pub async fn run<F>(&self, locate: F) -> Result<SessionOutcome>
    where
        F: FnMut() -> Option<Arc<dyn MeasurementClient>>,
    {
        let session_id = Uuid::new_v4();

        {
            let mut panel = lock(&self.panel);
            if panel.state() != SessionState::Idle {
                return Err(AppError::validation(
                    "a measurement session is already active",
                ));
            }
            panel.begin();
            panel.push_log(format!("Starting measurement session {}", session_id));
        }

        // Controls come back on every exit path below, including unwinds.
        let _restore = ControlRestore {
            panel: self.panel.clone(),
        };

        if !self.client_config.data_policy_accepted {
            let err = AppError::validation("data policy must be accepted before a run can start");
            let mut panel = lock(&self.panel);
            panel.push_log(err.to_string());
            panel.set_state(SessionState::Failed);
            return Err(err);
        }

        let client = match self.gate.wait_for(locate).await {
            Ok(client) => client,
            Err(err) => {
                let mut panel = lock(&self.panel);
                panel.push_log(err.to_string());
                panel.set_state(SessionState::Failed);
                return Err(err);
            }
        };

        lock(&self.panel).set_state(SessionState::Running);

        let callbacks = self.build_callbacks();
        match client.start(self.client_config.clone(), callbacks).await {
            Ok(exit_code) => {
                let mut panel = lock(&self.panel);
                panel.set_state(SessionState::Completed);
                panel.push_log(format!(
                    "Measurement run completed with exit code {}",
                    exit_code
                ));
                Ok(SessionOutcome {
                    session_id,
                    exit_code,
                })
            }
            Err(err) => {
                let err = match err {
                    run @ AppError::ClientRun(_) => run,
                    other => AppError::client_run(other.to_string()),
                };
                let mut panel = lock(&self.panel);
                panel.set_state(SessionState::Failed);
                panel.push_log(err.to_string());
                Err(err)
            }
        }
    }

    /// Handle a stop request. The measurement client exposes no cancellation
    /// primitive, so this only logs a notice and resets control enablement;
    /// a run in flight continues to completion.
    pub fn request_stop(&self) {
        let mut panel = lock(&self.panel);
        panel.push_log(
            "Stop requested. If the measurement client supports cancellation it will stop; \
             otherwise wait for completion.",
        );
        panel.controls.start_enabled = true;
        panel.controls.stop_enabled = false;
    }

    /// Progress handlers wired to the shared panel. Each is idempotent
    /// string assignment plus a log append, safe under any interleaving.
    fn build_callbacks(&self) -> CallbackSet {
        let panel = self.panel.clone();
        let on_server = move |server: &ServerRecord| {
            let label = server.label();
            let mut panel = lock(&panel);
            panel.display_mut().server = label.clone();
            panel.push_log(format!("Server chosen: {}", label));
        };

        let panel = self.panel.clone();
        let on_download =
            move |event: &Value| apply_throughput_event(&panel, event, Direction::Download);

        let panel = self.panel.clone();
        let on_upload =
            move |event: &Value| apply_throughput_event(&panel, event, Direction::Upload);

        let panel = self.panel.clone();
        let on_measurement = move |event: &Value| {
            let tag = extract::event_type(event).unwrap_or("event").to_string();
            lock(&panel).push_log(format!("Measurement event: {}", tag));
        };

        let panel = self.panel.clone();
        let on_error = move |message: &str| {
            lock(&panel).push_log(format!("Error: {}", message));
        };

        CallbackSet::new()
            .on_server_chosen(on_server)
            .on_download_measurement(on_download)
            .on_upload_measurement(on_upload)
            .on_measurement(on_measurement)
            .on_error(on_error)
    }
}

/// Shared body of the download/upload handlers: update the direction's
/// display slot when the event carries throughput, and the latency slot when
/// it carries latency. Events with neither change nothing.
fn apply_throughput_event(panel: &SharedPanel, event: &Value, direction: Direction) {
    let mbps = extract::throughput_mbps(event);
    let latency = extract::latency_ms(event);
    if mbps.is_none() && latency.is_none() {
        return;
    }

    let mut panel = lock(panel);
    if mbps.is_some() {
        let text = format_mbps(mbps);
        match direction {
            Direction::Download => panel.display_mut().download = text.clone(),
            Direction::Upload => panel.display_mut().upload = text.clone(),
        }
        panel.push_log(format!("{} update: {}", direction.as_str(), text));
    }
    if latency.is_some() {
        let text = format_ms(latency);
        panel.display_mut().latency = text.clone();
        panel.push_log(format!("Latency update: {}", text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_reset_placeholders() {
        let mut display = DisplayState::default();
        display.server = "mlab1".to_string();
        display.download = "10.00 Mb/s".to_string();
        display.reset();
        assert_eq!(display.server, "Not selected");
        assert_eq!(display.download, "—");
        assert_eq!(display.upload, "—");
        assert_eq!(display.latency, "—");
    }

    #[test]
    fn test_controls_default_enablement() {
        let controls = Controls::default();
        assert!(controls.start_enabled);
        assert!(!controls.stop_enabled);
    }

    #[test]
    fn test_log_newest_first() {
        let mut log = SessionLog::default();
        log.push("first");
        log.push("second");
        log.push("third");

        let lines = log.lines_newest_first();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("third"));
        assert!(lines[2].ends_with("first"));
        assert_eq!(log.latest(), Some("third"));
    }

    #[test]
    fn test_log_entry_render_shape() {
        let mut log = SessionLog::default();
        log.push("hello");
        let line = log.lines_newest_first().remove(0);
        // "[HH:MM:SS] hello"
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[9..11], "] ");
        assert!(line.ends_with("hello"));
    }

    #[test]
    fn test_panel_begin_side_effects() {
        let mut panel = StatusPanel::new();
        panel.display_mut().download = "99.00 Mb/s".to_string();
        panel.push_log("stale");

        panel.begin();

        assert_eq!(panel.state(), SessionState::Starting);
        assert!(!panel.controls().start_enabled);
        assert!(panel.controls().stop_enabled);
        assert_eq!(panel.display().download, "—");
        assert!(panel.log().is_empty());
    }

    #[test]
    fn test_restore_controls_returns_to_idle() {
        let mut panel = StatusPanel::new();
        panel.begin();
        panel.set_state(SessionState::Failed);
        panel.restore_controls();

        assert_eq!(panel.state(), SessionState::Idle);
        assert!(panel.controls().start_enabled);
        assert!(!panel.controls().stop_enabled);
    }

    #[test]
    fn test_request_stop_logs_and_resets_controls() {
        let config = Config::default_accepted();
        let controller = SessionController::new(&config);
        {
            let panel = controller.panel();
            lock(&panel).begin();
        }

        controller.request_stop();

        let snapshot = controller.snapshot();
        assert!(snapshot.start_enabled);
        assert!(!snapshot.stop_enabled);
        assert!(snapshot.log_lines[0].contains("Stop requested"));
    }

    #[test]
    fn test_callbacks_update_display() {
        let config = Config::default_accepted();
        let controller = SessionController::new(&config);
        let callbacks = controller.build_callbacks();

        callbacks.notify_server_chosen(&ServerRecord(json!({
            "machine": "mlab1-lga03",
            "location": {"city": "New York"}
        })));
        callbacks.notify_download(&json!({"data": {"MeanClientMbps": 42.0, "MinRTTMs": 12.5}}));
        callbacks.notify_upload(&json!({"data": {"MeanServerMbps": 17.0}}));
        callbacks.notify_error("socket closed");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.server, "mlab1-lga03 (New York)");
        assert_eq!(snapshot.download, "42.00 Mb/s");
        assert_eq!(snapshot.upload, "17.00 Mb/s");
        assert_eq!(snapshot.latency, "12.5 ms");
        assert!(snapshot.log_lines[0].contains("Error: socket closed"));
    }

    #[test]
    fn test_malformed_event_changes_nothing() {
        let config = Config::default_accepted();
        let controller = SessionController::new(&config);
        let callbacks = controller.build_callbacks();

        callbacks.notify_download(&json!({"data": {"MeanClientMbps": "fast"}}));
        callbacks.notify_download(&json!({"unexpected": true}));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.download, "—");
        assert_eq!(snapshot.latency, "—");
        assert!(snapshot.log_lines.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_rejects_unaccepted_data_policy() {
        let mut config = Config::default_accepted();
        config.data_policy_accepted = false;
        let controller = SessionController::new(&config);

        let result = controller.run(|| None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        let snapshot = controller.snapshot();
        assert!(snapshot.start_enabled);
        assert!(!snapshot.stop_enabled);
        assert_eq!(snapshot.state, SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_gate_timeout_logs_once_and_restores_controls() {
        let mut config = Config::default_accepted();
        config.gate_timeout_ms = 500;
        let controller = SessionController::new(&config);

        let result = controller.run(|| None).await;

        assert!(matches!(result, Err(AppError::ClientUnavailable(_))));
        let snapshot = controller.snapshot();
        assert!(snapshot.start_enabled);
        assert!(!snapshot.stop_enabled);

        let unavailable_lines = snapshot
            .log_lines
            .iter()
            .filter(|l| l.contains("unavailable"))
            .count();
        assert_eq!(unavailable_lines, 1);

        // the four display fields kept their reset placeholders
        assert_eq!(snapshot.server, "Not selected");
        assert_eq!(snapshot.download, "—");
        assert_eq!(snapshot.upload, "—");
        assert_eq!(snapshot.latency, "—");
    }
}
