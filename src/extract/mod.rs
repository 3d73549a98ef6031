//! Defensive extraction of display values from measurement events
//!
//! The external measurement client's event shape is not contractually stable
//! across versions, so every access here probes a prioritized list of known
//! field aliases rather than assuming one schema. A field that exists but is
//! not a number counts as absent, never as an error.

use serde_json::Value;

/// Top-level payload keys, probed in order. Older client builds emit
/// capitalized envelopes.
const PAYLOAD_KEYS: &[&str] = &["data", "Data"];

/// Event type keys, probed in order
const TYPE_KEYS: &[&str] = &["type", "Type"];

/// Direct mean-throughput fields, in priority order (client-side measurement
/// wins over server-side)
const THROUGHPUT_FIELDS: &[&str] = &["MeanClientMbps", "MeanServerMbps"];

/// Direct latency fields, in priority order
const LATENCY_FIELDS: &[&str] = &["MinRTTMs", "MinRTT", "Latency"];

/// Latency fields inside the nested transport-statistics record, in priority
/// order. "RTT" before "rtt" is deliberate.
const TCP_LATENCY_FIELDS: &[&str] = &["RTT", "rtt", "SmoothedRTT"];

/// Byte counters usable for the derived-throughput fallback, in priority order
const TCP_BYTE_FIELDS: &[&str] = &["BytesSent", "BytesReceived"];

/// Extract a throughput value in Mb/s from a measurement event, if any.
///
/// Derivation order: `MeanClientMbps`, then `MeanServerMbps`, then a value
/// computed from the nested `TCPInfo` record as `bytes * 8 / elapsed_us`
/// (elapsed time is in microseconds in the reference event shape, so the
/// quotient is already megabits per second).
pub fn throughput_mbps(event: &Value) -> Option<f64> {
    let data = payload(event)?;

    if let Some(mbps) = first_numeric(data, THROUGHPUT_FIELDS) {
        return Some(mbps);
    }

    let tcp_info = data.get("TCPInfo")?;
    let elapsed_us = numeric_field(tcp_info, "ElapsedTime").filter(|e| *e > 0.0)?;
    let bytes = first_numeric(tcp_info, TCP_BYTE_FIELDS)?;
    Some(bytes * 8.0 / elapsed_us)
}

/// Extract a latency value in milliseconds from a measurement event, if any.
///
/// Derivation order: `MinRTTMs`, `MinRTT`, `Latency`, then inside `TCPInfo`:
/// `RTT`, `rtt`, `SmoothedRTT`.
pub fn latency_ms(event: &Value) -> Option<f64> {
    let data = payload(event)?;

    if let Some(ms) = first_numeric(data, LATENCY_FIELDS) {
        return Some(ms);
    }

    let tcp_info = data.get("TCPInfo")?;
    first_numeric(tcp_info, TCP_LATENCY_FIELDS)
}

/// Extract the event's type tag for log display, if present
pub fn event_type(event: &Value) -> Option<&str> {
    TYPE_KEYS.iter().find_map(|key| event.get(key)?.as_str())
}

/// Locate the nested measurement payload inside the event envelope
fn payload(event: &Value) -> Option<&Value> {
    PAYLOAD_KEYS
        .iter()
        .find_map(|key| event.get(key))
        .filter(|v| v.is_object())
}

/// Read a named field as f64, treating non-numeric values as absent
fn numeric_field(record: &Value, field: &str) -> Option<f64> {
    record.get(field)?.as_f64()
}

/// Probe an ordered list of field names, first numeric match wins
fn first_numeric(record: &Value, fields: &[&str]) -> Option<f64> {
    fields.iter().find_map(|field| numeric_field(record, field))
}
