//! Per-endpoint streaming metrics
//!
//! - [`token_counter`]: unit counting policies
//! - [`accumulator`]: folds deltas into throughput and latency figures
//! - [`snapshot`]: the values published after every delta

pub mod accumulator;
pub mod snapshot;
pub mod token_counter;

pub use accumulator::MetricsAccumulator;
pub use snapshot::{ERROR_SENTINEL, EndpointMetrics, MetricCell, MetricsSnapshot, NOT_AVAILABLE};
pub use token_counter::{TokenCountPolicy, count};
