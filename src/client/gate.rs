//! Availability gate for the external measurement client
//!
//! The client may still be loading when the user triggers a test, so the
//! session controller waits here first: a bounded poll that suspends the
//! task between probes instead of blocking the thread.

use crate::error::{AppError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Bounded poll for the measurement client to become reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityGate {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for AvailabilityGate {
    fn default() -> Self {
        Self {
            timeout: crate::defaults::DEFAULT_GATE_TIMEOUT,
            poll_interval: crate::defaults::DEFAULT_GATE_POLL_INTERVAL,
        }
    }
}

impl AvailabilityGate {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Maximum total wait before the gate reports unavailability
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delay between reachability probes
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll `probe` until it yields a value or the deadline passes.
    ///
    /// The probe runs at least once, and once more after any sleep that
    /// straddles the deadline, so total wait never exceeds the timeout plus
    /// one poll interval.
    pub async fn wait_for<T, F>(&self, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Option<T>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(found) = probe() {
                return Ok(found);
            }
            if Instant::now() >= deadline {
                return Err(AppError::client_unavailable(format!(
                    "not reachable within {} ms",
                    self.timeout.as_millis()
                )));
            }
            sleep(self.poll_interval).await;
        }
    }
}
