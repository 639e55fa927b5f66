//! Fan-out of one prompt to every enabled endpoint
//!
//! Each enabled endpoint gets its own [`StreamConsumer`] task. Consumers send
//! their updates over a channel to a single coordinator task per run, which is
//! the only writer of the shared [`ResultTable`]. The coordinator drops any
//! update whose epoch is not the table's current epoch, so workers of a
//! superseded run that are still in flight cannot overwrite newer results.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::consumer::StreamConsumer;
use super::epoch::RunEpoch;
use super::status::EndpointStatus;
use super::table::{EndpointUpdate, MergeOutcome, ResultTable};
use crate::clock::{Clock, MonotonicClock};
use crate::config::EndpointConfig;
use crate::error::{BenchError, BenchResult};
use crate::llm::ChatStreamClient;
use crate::metrics::{EndpointMetrics, TokenCountPolicy};
use crate::types::{EndpointId, ResponseText};

/// Capacity of the per-run update channel
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Starts benchmark runs and owns the observable result table
pub struct Orchestrator {
    client: Arc<dyn ChatStreamClient>,
    clock: Arc<dyn Clock>,
    table: Arc<watch::Sender<ResultTable>>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn ChatStreamClient>) -> Self {
        Self::with_clock(client, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(client: Arc<dyn ChatStreamClient>, clock: Arc<dyn Clock>) -> Self {
        let (table, _) = watch::channel(ResultTable::new());
        Self {
            client,
            clock,
            table: Arc::new(table),
        }
    }

    /// Receiver notified after every applied update
    pub fn subscribe(&self) -> watch::Receiver<ResultTable> {
        self.table.subscribe()
    }

    /// Copy of the current table
    pub fn table(&self) -> ResultTable {
        self.table.borrow().clone()
    }

    pub fn current_epoch(&self) -> Option<RunEpoch> {
        self.table.borrow().epoch
    }

    /// Start a run over the enabled `endpoints`.
    ///
    /// Fails without touching the table when no endpoint is enabled or the
    /// prompt is blank. Otherwise the previous results are cleared, one task
    /// per enabled endpoint is spawned and the handle of the new run is
    /// returned immediately. Must be called within a Tokio runtime.
    pub fn run(
        &self,
        endpoints: &[EndpointConfig],
        prompt: &str,
        policy: TokenCountPolicy,
    ) -> BenchResult<RunHandle> {
        let enabled: Vec<EndpointConfig> =
            endpoints.iter().filter(|e| e.enabled).cloned().collect();
        if enabled.is_empty() {
            return Err(BenchError::invalid_field("No endpoint is enabled", "endpoints"));
        }
        if prompt.trim().is_empty() {
            return Err(BenchError::invalid_field("Prompt is empty", "prompt"));
        }

        let epoch = RunEpoch::new();
        self.table.send_replace(ResultTable::for_epoch(epoch));
        tracing::info!(
            run = %epoch.short(),
            endpoints = enabled.len(),
            policy = %policy,
            "Starting benchmark run"
        );

        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let prompt: Arc<str> = Arc::from(prompt);
        let expected: Vec<Participant> = enabled.iter().map(Participant::from).collect();

        for endpoint in enabled {
            let consumer = StreamConsumer::new(
                self.client.clone(),
                self.clock.clone(),
                endpoint,
                prompt.clone(),
                policy,
                epoch,
            );
            tokio::spawn(consumer.run(tx.clone()));
        }
        drop(tx);

        let coordinator = Coordinator {
            epoch,
            shared: self.table.clone(),
            local: ResultTable::for_epoch(epoch),
            expected,
        };
        let task = tokio::spawn(coordinator.run(rx));

        Ok(RunHandle { epoch, task })
    }
}

/// Handle of one started run
#[derive(Debug)]
pub struct RunHandle {
    epoch: RunEpoch,
    task: JoinHandle<ResultTable>,
}

impl RunHandle {
    pub fn epoch(&self) -> RunEpoch {
        self.epoch
    }

    /// Wait until every endpoint of this run is terminal.
    ///
    /// Returns this run's own final table, even if a newer run has replaced
    /// it in the orchestrator since.
    pub async fn wait(self) -> BenchResult<ResultTable> {
        self.task
            .await
            .map_err(|e| BenchError::other(format!("Run coordinator failed: {}", e)))
    }
}

/// Identity of an endpoint taking part in a run
#[derive(Debug, Clone)]
struct Participant {
    id: EndpointId,
    name: String,
    model: String,
}

impl From<&EndpointConfig> for Participant {
    fn from(endpoint: &EndpointConfig) -> Self {
        Self {
            id: endpoint.id,
            name: endpoint.name.clone(),
            model: endpoint.model.clone(),
        }
    }
}

/// Serializes all merges of one run
struct Coordinator {
    epoch: RunEpoch,
    shared: Arc<watch::Sender<ResultTable>>,
    local: ResultTable,
    expected: Vec<Participant>,
}

impl Coordinator {
    async fn run(mut self, mut updates: mpsc::Receiver<EndpointUpdate>) -> ResultTable {
        while let Some(update) = updates.recv().await {
            self.merge(update);
        }

        // Every sender is gone. Endpoints without a terminal row stopped
        // without reporting, e.g. their task panicked.
        for participant in self.abandoned() {
            tracing::warn!(endpoint = %participant.name, "Endpoint stopped without a final status");
            self.merge(EndpointUpdate {
                epoch: self.epoch,
                endpoint_id: participant.id,
                name: participant.name,
                model: participant.model,
                status: EndpointStatus::Error,
                metrics: EndpointMetrics::Errored,
                response: ResponseText::failure("worker stopped before finishing"),
            });
        }

        tracing::info!(
            run = %self.epoch.short(),
            done = self.local.count_with(EndpointStatus::Done),
            failed = self.local.count_with(EndpointStatus::Error),
            "Benchmark run complete"
        );
        self.local
    }

    fn merge(&mut self, update: EndpointUpdate) {
        let local = self.local.apply(update.clone());
        if local == MergeOutcome::Regression {
            tracing::warn!(
                endpoint = %update.name,
                status = %update.status,
                "Ignoring out-of-order update"
            );
            return;
        }

        let mut outcome = MergeOutcome::Applied;
        self.shared.send_if_modified(|table| {
            outcome = table.apply(update);
            outcome.is_applied()
        });
        if outcome == MergeOutcome::StaleEpoch {
            tracing::warn!(run = %self.epoch.short(), "Discarding update of superseded run");
        }
    }

    fn abandoned(&self) -> Vec<Participant> {
        let statuses: HashMap<EndpointId, EndpointStatus> = self
            .local
            .rows
            .iter()
            .map(|r| (r.endpoint_id, r.status))
            .collect();
        self.expected
            .iter()
            .filter(|p| !statuses.get(&p.id).is_some_and(|s| s.is_terminal()))
            .cloned()
            .collect()
    }
}
