//! Fixed-precision formatting of measurement values
//!
//! Pure and total: every input, including absent and NaN values, maps to a
//! defined display string.

/// Sentinel shown when no value could be extracted from an event
pub const NOT_AVAILABLE: &str = "N/A";

/// A fixed-precision numeric display format with a unit suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricFormat {
    /// Decimal places
    pub precision: usize,
    /// Unit suffix, separated from the number by one space
    pub unit: &'static str,
}

/// Throughput display format: two decimal places, megabits per second
pub const THROUGHPUT: MetricFormat = MetricFormat {
    precision: 2,
    unit: "Mb/s",
};

/// Latency display format: one decimal place, milliseconds
pub const LATENCY: MetricFormat = MetricFormat {
    precision: 1,
    unit: "ms",
};

impl MetricFormat {
    /// Format a possibly-absent value. NaN counts as absent.
    pub fn format(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if !v.is_nan() => format!("{:.*} {}", self.precision, v, self.unit),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Format a throughput value in Mb/s
pub fn format_mbps(value: Option<f64>) -> String {
    THROUGHPUT.format(value)
}

/// Format a latency value in milliseconds
pub fn format_ms(value: Option<f64>) -> String {
    LATENCY.format(value)
}
