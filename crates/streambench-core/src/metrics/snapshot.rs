//! Metric snapshot and display cells

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker shown in every metric cell of a failed endpoint
pub const ERROR_SENTINEL: &str = "Error";

/// Marker shown while no first token has arrived
pub const NOT_AVAILABLE: &str = "N/A";

/// Metrics of one endpoint after the latest observation.
///
/// Latency and elapsed values are in seconds, throughputs in units per second.
/// Throughputs are `0.0` whenever their time window is empty, never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Time from request issuance to the first non-empty delta
    pub first_token_latency: Option<f64>,
    pub reasoning_throughput: f64,
    pub content_throughput: f64,
    pub total_throughput: f64,
    /// Time from request issuance to the latest observation
    pub total_elapsed: f64,
    pub reasoning_units: u64,
    pub content_units: u64,
}

impl MetricsSnapshot {
    pub fn total_units(&self) -> u64 {
        self.reasoning_units + self.content_units
    }
}

/// Metrics as published for an endpoint: real numbers, or the error sentinel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum EndpointMetrics {
    Measured(MetricsSnapshot),
    Errored,
}

impl Default for EndpointMetrics {
    fn default() -> Self {
        Self::Measured(MetricsSnapshot::default())
    }
}

impl EndpointMetrics {
    pub fn snapshot(&self) -> Option<&MetricsSnapshot> {
        match self {
            Self::Measured(snapshot) => Some(snapshot),
            Self::Errored => None,
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, Self::Errored)
    }

    pub fn first_token_cell(&self) -> MetricCell {
        match self {
            Self::Measured(s) => s
                .first_token_latency
                .map_or(MetricCell::NotAvailable, MetricCell::Value),
            Self::Errored => MetricCell::Error,
        }
    }

    pub fn reasoning_cell(&self) -> MetricCell {
        self.cell(|s| s.reasoning_throughput)
    }

    pub fn content_cell(&self) -> MetricCell {
        self.cell(|s| s.content_throughput)
    }

    pub fn total_cell(&self) -> MetricCell {
        self.cell(|s| s.total_throughput)
    }

    pub fn elapsed_cell(&self) -> MetricCell {
        self.cell(|s| s.total_elapsed)
    }

    fn cell(&self, pick: impl Fn(&MetricsSnapshot) -> f64) -> MetricCell {
        match self {
            Self::Measured(s) => MetricCell::Value(pick(s)),
            Self::Errored => MetricCell::Error,
        }
    }
}

/// One rendered metric column.
///
/// Serializes as a bare number, `"N/A"` or `"Error"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricCell {
    Value(f64),
    NotAvailable,
    Error,
}

impl MetricCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for MetricCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{:.2}", v),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
            Self::Error => f.write_str(ERROR_SENTINEL),
        }
    }
}

impl Serialize for MetricCell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
            Self::Error => serializer.serialize_str(ERROR_SENTINEL),
        }
    }
}
