//! Published per-endpoint updates and the merged result table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::epoch::RunEpoch;
use super::status::EndpointStatus;
use crate::metrics::{EndpointMetrics, MetricCell};
use crate::types::{EndpointId, ResponseText};

/// One tuple published by a stream consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointUpdate {
    pub epoch: RunEpoch,
    pub endpoint_id: EndpointId,
    pub name: String,
    pub model: String,
    pub status: EndpointStatus,
    pub metrics: EndpointMetrics,
    pub response: ResponseText,
}

/// Latest known state of one endpoint in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub endpoint_id: EndpointId,
    pub name: String,
    pub model: String,
    pub status: EndpointStatus,
    pub metrics: EndpointMetrics,
}

impl ResultRow {
    /// Metrics as displayed: the sentinel everywhere once the status is `error`
    pub fn display_metrics(&self) -> EndpointMetrics {
        if self.status == EndpointStatus::Error {
            EndpointMetrics::Errored
        } else {
            self.metrics
        }
    }

    /// Row in its externally visible form
    pub fn view(&self) -> ResultRowView {
        let metrics = self.display_metrics();
        ResultRowView {
            endpoint_id: self.endpoint_id,
            display_name: self.name.clone(),
            model_identifier: self.model.clone(),
            first_token_latency_seconds: metrics.first_token_cell(),
            reasoning_throughput: metrics.reasoning_cell(),
            content_throughput: metrics.content_cell(),
            total_throughput: metrics.total_cell(),
            total_elapsed_seconds: metrics.elapsed_cell(),
            status: self.status,
        }
    }
}

/// Serialized row: numbers, `"N/A"` for a missing first token, `"Error"` when failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRowView {
    pub endpoint_id: EndpointId,
    pub display_name: String,
    pub model_identifier: String,
    pub first_token_latency_seconds: MetricCell,
    pub reasoning_throughput: MetricCell,
    pub content_throughput: MetricCell,
    pub total_throughput: MetricCell,
    pub total_elapsed_seconds: MetricCell,
    pub status: EndpointStatus,
}

/// Result of merging one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    /// Produced by a run other than the table's current one
    StaleEpoch,
    /// Would move the endpoint's status backwards
    Regression,
}

impl MergeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Results of the current run, keyed by endpoint id.
///
/// Rows keep the order in which endpoints first published. Responses only
/// ever grow within a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub epoch: Option<RunEpoch>,
    pub rows: Vec<ResultRow>,
    pub responses: BTreeMap<EndpointId, ResponseText>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table owned by `epoch`
    pub fn for_epoch(epoch: RunEpoch) -> Self {
        Self {
            epoch: Some(epoch),
            ..Self::default()
        }
    }

    /// Merge one update, last write wins per endpoint
    pub fn apply(&mut self, update: EndpointUpdate) -> MergeOutcome {
        if self.epoch != Some(update.epoch) {
            return MergeOutcome::StaleEpoch;
        }

        let current = self.status_of(update.endpoint_id);
        if !current.can_transition_to(update.status) {
            return MergeOutcome::Regression;
        }

        let row = ResultRow {
            endpoint_id: update.endpoint_id,
            name: update.name,
            model: update.model,
            status: update.status,
            metrics: update.metrics,
        };
        match self
            .rows
            .iter_mut()
            .find(|r| r.endpoint_id == update.endpoint_id)
        {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
        self.responses.insert(update.endpoint_id, update.response);
        MergeOutcome::Applied
    }

    pub fn row(&self, id: EndpointId) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.endpoint_id == id)
    }

    pub fn response(&self, id: EndpointId) -> Option<&ResponseText> {
        self.responses.get(&id)
    }

    /// Status of an endpoint, `idle` if it has not published in this run
    pub fn status_of(&self, id: EndpointId) -> EndpointStatus {
        self.row(id).map(|r| r.status).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether every row has reached `done` or `error`
    pub fn all_terminal(&self) -> bool {
        self.rows.iter().all(|r| r.status.is_terminal())
    }

    pub fn count_with(&self, status: EndpointStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    pub fn views(&self) -> Vec<ResultRowView> {
        self.rows.iter().map(ResultRow::view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsSnapshot;

    fn update(epoch: RunEpoch, id: u64, status: EndpointStatus) -> EndpointUpdate {
        EndpointUpdate {
            epoch,
            endpoint_id: EndpointId(id),
            name: format!("endpoint-{}", id),
            model: "m".to_string(),
            status,
            metrics: EndpointMetrics::default(),
            response: ResponseText::default(),
        }
    }

    #[test]
    fn test_rows_keep_arrival_order() {
        let epoch = RunEpoch::new();
        let mut table = ResultTable::for_epoch(epoch);

        table.apply(update(epoch, 2, EndpointStatus::Waiting));
        table.apply(update(epoch, 1, EndpointStatus::Waiting));
        table.apply(update(epoch, 2, EndpointStatus::Streaming));

        let ids: Vec<u64> = table.rows.iter().map(|r| r.endpoint_id.0).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(table.status_of(EndpointId(2)), EndpointStatus::Streaming);
    }

    #[test]
    fn test_stale_epoch_rejected() {
        let old = RunEpoch::new();
        let current = RunEpoch::new();
        let mut table = ResultTable::for_epoch(current);

        let outcome = table.apply(update(old, 1, EndpointStatus::Waiting));
        assert_eq!(outcome, MergeOutcome::StaleEpoch);
        assert!(table.is_empty());
        assert!(table.responses.is_empty());
    }

    #[test]
    fn test_table_without_epoch_rejects_everything() {
        let mut table = ResultTable::new();
        let outcome = table.apply(update(RunEpoch::new(), 1, EndpointStatus::Waiting));
        assert_eq!(outcome, MergeOutcome::StaleEpoch);
    }

    #[test]
    fn test_terminal_rows_do_not_regress() {
        let epoch = RunEpoch::new();
        let mut table = ResultTable::for_epoch(epoch);
        table.apply(update(epoch, 1, EndpointStatus::Waiting));
        table.apply(update(epoch, 1, EndpointStatus::Done));

        let outcome = table.apply(update(epoch, 1, EndpointStatus::Streaming));
        assert_eq!(outcome, MergeOutcome::Regression);
        assert_eq!(table.status_of(EndpointId(1)), EndpointStatus::Done);
        assert!(table.all_terminal());
    }

    #[test]
    fn test_response_replaced_by_latest_update() {
        let epoch = RunEpoch::new();
        let mut table = ResultTable::for_epoch(epoch);
        let mut first = update(epoch, 1, EndpointStatus::Streaming);
        first.response.content = "Hel".to_string();
        let mut second = update(epoch, 1, EndpointStatus::Streaming);
        second.response.content = "Hello".to_string();

        table.apply(first);
        table.apply(second);
        assert_eq!(table.response(EndpointId(1)).unwrap().content, "Hello");
    }

    #[test]
    fn test_view_of_measured_row() {
        let row = ResultRow {
            endpoint_id: EndpointId(1),
            name: "Bailian".to_string(),
            model: "deepseek-r1".to_string(),
            status: EndpointStatus::Done,
            metrics: EndpointMetrics::Measured(MetricsSnapshot {
                first_token_latency: Some(0.1),
                reasoning_throughput: 15.0,
                content_throughput: 10.0,
                total_throughput: 6.0,
                total_elapsed: 1.0,
                reasoning_units: 3,
                content_units: 3,
            }),
        };

        let json = serde_json::to_value(row.view()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "endpointId": 1,
                "displayName": "Bailian",
                "modelIdentifier": "deepseek-r1",
                "firstTokenLatencySeconds": 0.1,
                "reasoningThroughput": 15.0,
                "contentThroughput": 10.0,
                "totalThroughput": 6.0,
                "totalElapsedSeconds": 1.0,
                "status": "done"
            })
        );
    }

    #[test]
    fn test_view_without_first_token() {
        let row = ResultRow {
            endpoint_id: EndpointId(3),
            name: "Slow".to_string(),
            model: "m".to_string(),
            status: EndpointStatus::Waiting,
            metrics: EndpointMetrics::default(),
        };
        let view = row.view();
        assert_eq!(view.first_token_latency_seconds, MetricCell::NotAvailable);
        assert_eq!(view.total_throughput, MetricCell::Value(0.0));
    }

    #[test]
    fn test_view_of_error_row_uses_sentinel_everywhere() {
        let row = ResultRow {
            endpoint_id: EndpointId(2),
            name: "Broken".to_string(),
            model: "m".to_string(),
            status: EndpointStatus::Error,
            metrics: EndpointMetrics::default(),
        };

        let json = serde_json::to_value(row.view()).unwrap();
        for field in [
            "firstTokenLatencySeconds",
            "reasoningThroughput",
            "contentThroughput",
            "totalThroughput",
            "totalElapsedSeconds",
        ] {
            assert_eq!(json[field], "Error", "{}", field);
        }
        assert_eq!(json["status"], "error");
    }
}
