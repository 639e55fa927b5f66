//! The concurrent benchmark engine
//!
//! [`Orchestrator::run`] spawns one [`StreamConsumer`] per enabled endpoint
//! and merges their [`EndpointUpdate`]s into a [`ResultTable`] that callers
//! observe through a watch channel. [`rank`] orders the finished rows.

pub mod consumer;
pub mod epoch;
pub mod orchestrator;
pub mod ranking;
pub mod status;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use consumer::StreamConsumer;
pub use epoch::RunEpoch;
pub use orchestrator::{Orchestrator, RunHandle};
pub use ranking::{RankedEntry, rank};
pub use status::EndpointStatus;
pub use table::{EndpointUpdate, MergeOutcome, ResultRow, ResultRowView, ResultTable};
