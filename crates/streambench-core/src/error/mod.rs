//! Error types for streambench
//!
//! Every fallible operation in the engine returns [`BenchResult`]. Errors raised
//! inside one endpoint's worker never leave that worker: the stream consumer
//! turns them into a terminal `error` status for that endpoint only.

mod constructors;
mod conversions;
mod types;

pub use types::{BenchError, BenchResult};
