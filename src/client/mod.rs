//! Boundary with the external measurement client
//!
//! The measurement client performs the actual network test (transport,
//! protocol, statistics) and is treated as an opaque collaborator: this crate
//! only hands it a configuration and a callback set, then awaits its exit
//! code. Progress arrives through the callbacks as duck-typed JSON events.

pub mod gate;

pub use gate::AvailabilityGate;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Metadata forwarded to the measurement client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
    /// Client name reported to the measurement infrastructure
    pub client_name: String,
}

/// Configuration handed to the measurement client's start call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Must be true for a run to proceed. Wire name matches the reference
    /// client's option.
    #[serde(rename = "userAcceptedDataPolicy")]
    pub data_policy_accepted: bool,
    /// Metadata forwarded with the run
    pub metadata: ClientMetadata,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(client_name: S) -> Self {
        Self {
            data_policy_accepted: true,
            metadata: ClientMetadata {
                client_name: client_name.into(),
            },
        }
    }
}

/// Duck-typed record describing the server the client selected.
///
/// The shape varies across client versions, so fields are probed rather than
/// deserialized into a fixed struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerRecord(pub Value);

impl ServerRecord {
    /// Human-readable label: a name-like field plus the city when present,
    /// else the whole record serialized.
    pub fn label(&self) -> String {
        let name = self
            .0
            .get("machine")
            .and_then(Value::as_str)
            .or_else(|| self.0.get("server").and_then(Value::as_str));

        let city = self
            .0
            .get("location")
            .and_then(|loc| loc.get("city"))
            .and_then(Value::as_str);

        match (name, city) {
            (Some(name), Some(city)) => format!("{} ({})", name, city),
            (Some(name), None) => name.to_string(),
            (None, _) => self.0.to_string(),
        }
    }
}

/// Callback invoked when the client has chosen a server
pub type ServerCallback = Box<dyn Fn(&ServerRecord) + Send + Sync>;
/// Callback invoked with a measurement event
pub type MeasurementCallback = Box<dyn Fn(&Value) + Send + Sync>;
/// Callback invoked when the client reports an error
pub type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Set of progress handlers registered with a run.
///
/// Every handler is optional and may be invoked zero or more times, in any
/// interleaving the client produces. Handlers are a side channel of progress
/// notifications, independent of the future returned by
/// [`MeasurementClient::start`].
#[derive(Default)]
pub struct CallbackSet {
    pub server_chosen: Option<ServerCallback>,
    pub download_measurement: Option<MeasurementCallback>,
    pub upload_measurement: Option<MeasurementCallback>,
    pub measurement: Option<MeasurementCallback>,
    pub error: Option<ErrorCallback>,
}

impl CallbackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_server_chosen<F>(mut self, f: F) -> Self
    where
        F: Fn(&ServerRecord) + Send + Sync + 'static,
    {
        self.server_chosen = Some(Box::new(f));
        self
    }

    pub fn on_download_measurement<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.download_measurement = Some(Box::new(f));
        self
    }

    pub fn on_upload_measurement<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.upload_measurement = Some(Box::new(f));
        self
    }

    pub fn on_measurement<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.measurement = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    /// Notify the server-chosen handler, if registered
    pub fn notify_server_chosen(&self, server: &ServerRecord) {
        if let Some(cb) = &self.server_chosen {
            cb(server);
        }
    }

    /// Notify the download handler, if registered
    pub fn notify_download(&self, event: &Value) {
        if let Some(cb) = &self.download_measurement {
            cb(event);
        }
    }

    /// Notify the upload handler, if registered
    pub fn notify_upload(&self, event: &Value) {
        if let Some(cb) = &self.upload_measurement {
            cb(event);
        }
    }

    /// Notify the generic measurement handler, if registered
    pub fn notify_measurement(&self, event: &Value) {
        if let Some(cb) = &self.measurement {
            cb(event);
        }
    }

    /// Notify the error handler, if registered
    pub fn notify_error(&self, message: &str) {
        if let Some(cb) = &self.error {
            cb(message);
        }
    }
}

impl std::fmt::Debug for CallbackSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSet")
            .field("server_chosen", &self.server_chosen.is_some())
            .field("download_measurement", &self.download_measurement.is_some())
            .field("upload_measurement", &self.upload_measurement.is_some())
            .field("measurement", &self.measurement.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

/// The external measurement client.
///
/// `start` runs one complete test and resolves to the client's integer exit
/// code, or an error when the run is rejected. Callbacks fire during the
/// await; no cancellation primitive is part of this interface.
#[async_trait]
pub trait MeasurementClient: Send + Sync {
    async fn start(&self, config: ClientConfig, callbacks: CallbackSet) -> Result<i32>;
}

/// Process-wide install point for the measurement client.
///
/// The client may be loaded asynchronously by the embedding application, so
/// it is not guaranteed present when the user triggers a test; the
/// availability gate polls [`registry::locate`] until it is.
pub mod registry {
    use super::*;

    static CLIENT: OnceLock<Arc<dyn MeasurementClient>> = OnceLock::new();

    /// Install the measurement client. Only the first install wins.
    pub fn install(client: Arc<dyn MeasurementClient>) -> bool {
        CLIENT.set(client).is_ok()
    }

    /// Look up the installed client, if any
    pub fn locate() -> Option<Arc<dyn MeasurementClient>> {
        CLIENT.get().cloned()
    }
}
