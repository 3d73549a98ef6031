//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Lifecycle states of a measurement session.
///
/// Transitions: Idle → Starting → Running → (Completed | Failed) → Idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session active, start control enabled
    #[default]
    Idle,
    /// Start requested, waiting for the measurement client to be reachable
    Starting,
    /// The measurement client accepted the configuration and is running
    Running,
    /// The client's run resolved with an exit code
    Completed,
    /// The gate timed out or the client's run was rejected
    Failed,
}

impl SessionState {
    /// Get the state name as displayed in debug output
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Starting => "starting",
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        }
    }

    /// Whether this is a terminal state (controls are restored on entry)
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}

/// Direction of a throughput measurement event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Download,
    Upload,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Download => "Download",
            Direction::Upload => "Upload",
        }
    }
}

/// Outcome of a finished measurement session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// Correlation id assigned when the session started
    pub session_id: Uuid,
    /// Exit code the client's run resolved with
    pub exit_code: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::Completed.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Starting.is_terminal());
        assert!(!SessionState::Running.is_terminal());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Starting.as_str(), "starting");
        assert_eq!(Direction::Download.as_str(), "Download");
        assert_eq!(Direction::Upload.as_str(), "Upload");
    }
}
