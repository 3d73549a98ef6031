//! Error handling for the measurement session monitor

use thiserror::Error;

/// Custom error types for the measurement session monitor
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The external measurement client never became reachable
    #[error("Measurement client unavailable: {0}")]
    ClientUnavailable(String),

    /// The external measurement client rejected or aborted a run
    #[error("Measurement run failed: {0}")]
    ClientRun(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new client-unavailable error
    pub fn client_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ClientUnavailable(message.into())
    }

    /// Create a new client-run error
    pub fn client_run<S: Into<String>>(message: S) -> Self {
        Self::ClientRun(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get the appropriate process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Validation(_) => 2,
            AppError::ClientUnavailable(_) => 3,
            AppError::ClientRun(_) => 4,
            AppError::Internal(_) => 1,
        }
    }

    /// Whether the error leaves the application in a usable state.
    ///
    /// Every session error is recoverable: controls are restored and the
    /// user may simply start another run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Internal(_))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {}", error))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::config("missing client name");
        assert_eq!(error.to_string(), "Configuration error: missing client name");

        let error = AppError::client_unavailable("timed out after 10000 ms");
        assert_eq!(
            error.to_string(),
            "Measurement client unavailable: timed out after 10000 ms"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 2);
        assert_eq!(AppError::validation("x").exit_code(), 2);
        assert_eq!(AppError::client_unavailable("x").exit_code(), 3);
        assert_eq!(AppError::client_run("x").exit_code(), 4);
        assert_eq!(AppError::internal("x").exit_code(), 1);
    }

    #[test]
    fn test_recoverability() {
        assert!(AppError::client_unavailable("x").is_recoverable());
        assert!(AppError::client_run("x").is_recoverable());
        assert!(!AppError::internal("x").is_recoverable());
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("boundary failure");
        let app_error: AppError = anyhow_error.into();
        assert!(matches!(app_error, AppError::Internal(_)));
        assert!(app_error.to_string().contains("boundary failure"));
    }
}
