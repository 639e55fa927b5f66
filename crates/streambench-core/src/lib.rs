//! Streambench core
//!
//! Sends one prompt to several OpenAI-compatible chat completion endpoints at
//! once and measures, per endpoint, the first-token latency and the reasoning,
//! content and total throughput of the streamed answer.
//!
//! ```no_run
//! use std::sync::Arc;
//! use streambench_core::{BenchConfig, OpenAiCompatClient, Orchestrator};
//!
//! # async fn example() -> streambench_core::BenchResult<()> {
//! let config = BenchConfig::default().resolve_api_keys_with(|name| std::env::var(name).ok());
//! let orchestrator = Orchestrator::new(Arc::new(OpenAiCompatClient::new()?));
//! let handle = orchestrator.run(&config.endpoints, &config.prompt, config.token_count)?;
//! let table = handle.wait().await?;
//! for row in table.views() {
//!     println!("{}: {} u/s", row.display_name, row.total_throughput);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bench;
pub mod clock;
pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod report;
pub mod types;

pub use bench::{
    EndpointStatus, EndpointUpdate, Orchestrator, RankedEntry, ResultRow, ResultRowView,
    ResultTable, RunEpoch, RunHandle, StreamConsumer, rank,
};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{BenchConfig, EndpointConfig, LogFormat, LoggingConfig};
pub use error::{BenchError, BenchResult};
pub use llm::{ChatStreamClient, ChunkStream, Delta, OpenAiCompatClient, StreamChunk};
pub use metrics::{
    EndpointMetrics, MetricCell, MetricsAccumulator, MetricsSnapshot, TokenCountPolicy,
};
pub use report::{ReportFormat, RunReport, generate_report};
pub use types::{EndpointId, ResponseText};
