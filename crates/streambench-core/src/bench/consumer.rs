//! Drives one endpoint's streaming request

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::instrument;

use super::epoch::RunEpoch;
use super::status::EndpointStatus;
use super::table::EndpointUpdate;
use crate::clock::Clock;
use crate::config::EndpointConfig;
use crate::error::BenchResult;
use crate::llm::ChatStreamClient;
use crate::metrics::{EndpointMetrics, MetricsAccumulator, TokenCountPolicy};
use crate::types::ResponseText;

/// Consumes the stream of a single endpoint for a single run.
///
/// Publishes a `waiting` update, one `streaming` update per non-empty chunk and
/// exactly one terminal update. Never reads another endpoint's state.
pub struct StreamConsumer {
    client: Arc<dyn ChatStreamClient>,
    clock: Arc<dyn Clock>,
    endpoint: EndpointConfig,
    prompt: Arc<str>,
    policy: TokenCountPolicy,
    epoch: RunEpoch,
}

impl StreamConsumer {
    pub fn new(
        client: Arc<dyn ChatStreamClient>,
        clock: Arc<dyn Clock>,
        endpoint: EndpointConfig,
        prompt: Arc<str>,
        policy: TokenCountPolicy,
        epoch: RunEpoch,
    ) -> Self {
        Self {
            client,
            clock,
            endpoint,
            prompt,
            policy,
            epoch,
        }
    }

    /// Run to completion and return the terminal status
    #[instrument(
        skip_all,
        fields(endpoint = %self.endpoint.name, id = %self.endpoint.id, run = %self.epoch.short())
    )]
    pub async fn run(self, updates: mpsc::Sender<EndpointUpdate>) -> EndpointStatus {
        let mut acc = MetricsAccumulator::new(self.clock.now_millis());
        self.publish(
            &updates,
            EndpointStatus::Waiting,
            EndpointMetrics::Measured(acc.snapshot()),
            ResponseText::default(),
        )
        .await;

        match self.consume(&mut acc, &updates).await {
            Ok(()) => {
                let snapshot = acc.finish(self.clock.now_millis());
                tracing::info!(
                    total_throughput = snapshot.total_throughput,
                    elapsed = snapshot.total_elapsed,
                    "Endpoint finished"
                );
                self.publish(
                    &updates,
                    EndpointStatus::Done,
                    EndpointMetrics::Measured(snapshot),
                    acc.response().clone(),
                )
                .await;
                EndpointStatus::Done
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), "Endpoint failed: {}", err);
                self.publish(
                    &updates,
                    EndpointStatus::Error,
                    EndpointMetrics::Errored,
                    ResponseText::failure(err.user_message()),
                )
                .await;
                EndpointStatus::Error
            }
        }
    }

    async fn consume(
        &self,
        acc: &mut MetricsAccumulator,
        updates: &mpsc::Sender<EndpointUpdate>,
    ) -> BenchResult<()> {
        let mut stream = self.client.chat_stream(&self.endpoint, &self.prompt).await?;

        while let Some(item) = stream.next().await {
            let chunk = item?;
            let now = self.clock.now_millis();

            let mut observed = false;
            for delta in chunk.deltas() {
                if delta.is_empty() {
                    continue;
                }
                acc.observe(&delta, now, self.policy);
                observed = true;
            }
            if !observed {
                tracing::trace!("Skipping empty chunk");
                continue;
            }

            tracing::debug!(
                reasoning_units = acc.snapshot().reasoning_units,
                content_units = acc.snapshot().content_units,
                "Observed chunk"
            );
            self.publish(
                updates,
                EndpointStatus::Streaming,
                EndpointMetrics::Measured(acc.snapshot()),
                acc.response().clone(),
            )
            .await;
        }

        Ok(())
    }

    async fn publish(
        &self,
        updates: &mpsc::Sender<EndpointUpdate>,
        status: EndpointStatus,
        metrics: EndpointMetrics,
        response: ResponseText,
    ) {
        let update = EndpointUpdate {
            epoch: self.epoch,
            endpoint_id: self.endpoint.id,
            name: self.endpoint.name.clone(),
            model: self.endpoint.model.clone(),
            status,
            metrics,
            response,
        };
        if updates.send(update).await.is_err() {
            tracing::debug!("Update channel closed, dropping {} update", status);
        }
    }
}
