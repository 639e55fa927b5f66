//! Ranking of finished endpoints by total throughput

use serde::Serialize;

use super::status::EndpointStatus;
use super::table::ResultRow;
use crate::types::EndpointId;

/// One bar of the ranking chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based
    pub position: usize,
    pub endpoint_id: EndpointId,
    pub display_name: String,
    pub model: String,
    pub total_throughput: f64,
    pub first_token_latency: Option<f64>,
    pub total_elapsed: f64,
    /// `total_throughput / max(top throughput, 1)`, in `0..=1`
    pub bar_width: f64,
}

impl RankedEntry {
    /// Medal for the podium, `#n` below it
    pub fn badge(&self) -> String {
        match self.position {
            1 => "🥇".to_string(),
            2 => "🥈".to_string(),
            3 => "🥉".to_string(),
            n => format!("#{}", n),
        }
    }
}

/// Rank successfully finished rows, fastest first.
///
/// Rows that are not `done` or carry the error sentinel are left out. Ties
/// keep table order.
pub fn rank(rows: &[ResultRow]) -> Vec<RankedEntry> {
    let mut finished: Vec<(&ResultRow, f64)> = rows
        .iter()
        .filter(|row| row.status == EndpointStatus::Done)
        .filter_map(|row| {
            let snapshot = row.display_metrics().snapshot().copied()?;
            snapshot
                .total_throughput
                .is_finite()
                .then_some((row, snapshot.total_throughput))
        })
        .collect();

    // sort_by is stable
    finished.sort_by(|a, b| b.1.total_cmp(&a.1));

    let scale = finished
        .iter()
        .map(|(_, throughput)| *throughput)
        .fold(1.0_f64, f64::max);

    finished
        .into_iter()
        .enumerate()
        .map(|(index, (row, throughput))| {
            let snapshot = row.metrics.snapshot().copied().unwrap_or_default();
            RankedEntry {
                position: index + 1,
                endpoint_id: row.endpoint_id,
                display_name: row.name.clone(),
                model: row.model.clone(),
                total_throughput: throughput,
                first_token_latency: snapshot.first_token_latency,
                total_elapsed: snapshot.total_elapsed,
                bar_width: throughput / scale,
            }
        })
        .collect()
}
