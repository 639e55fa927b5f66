//! Live per-endpoint progress while a run streams

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;
use streambench_core::{EndpointConfig, EndpointId, EndpointStatus, ResultRow, ResultTable};

use crate::console::status_label;

/// One spinner per enabled endpoint, fed from the orchestrator's table
pub struct LiveProgress {
    multi: MultiProgress,
    bars: HashMap<EndpointId, ProgressBar>,
}

impl LiveProgress {
    pub fn new<'a>(endpoints: impl IntoIterator<Item = &'a EndpointConfig>) -> Self {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✔");

        let endpoints: Vec<&EndpointConfig> = endpoints.into_iter().collect();
        let prefix_width = endpoints
            .iter()
            .map(|e| console::measure_text_width(&e.name))
            .max()
            .unwrap_or(0);

        let bars = endpoints
            .into_iter()
            .map(|endpoint| {
                let bar = multi.add(ProgressBar::new_spinner());
                bar.set_style(style.clone());
                bar.set_prefix(
                    console::pad_str(&endpoint.name, prefix_width, console::Alignment::Left, None)
                        .into_owned(),
                );
                bar.set_message(status_label(EndpointStatus::Idle).to_string());
                bar.enable_steady_tick(Duration::from_millis(100));
                (endpoint.id, bar)
            })
            .collect();

        Self { multi, bars }
    }

    /// Refresh every spinner from the latest table
    pub fn update(&self, table: &ResultTable) {
        for row in &table.rows {
            let Some(bar) = self.bars.get(&row.endpoint_id) else {
                continue;
            };
            if bar.is_finished() {
                continue;
            }
            let message = progress_message(row);
            if row.status.is_terminal() {
                bar.finish_with_message(message);
            } else {
                bar.set_message(message);
            }
        }
    }

    /// Remove the spinners before the final tables are printed
    pub fn finish(self) {
        for bar in self.bars.values() {
            bar.finish_and_clear();
        }
        if let Err(err) = self.multi.clear() {
            tracing::debug!("Failed to clear progress display: {}", err);
        }
    }
}

fn progress_message(row: &ResultRow) -> String {
    let metrics = row.display_metrics();
    let status = status_label(row.status);
    match (row.status, metrics.snapshot()) {
        (EndpointStatus::Waiting, _) => format!("{} for first token", status),
        (EndpointStatus::Error, _) => status.to_string(),
        (_, Some(snapshot)) => format!(
            "{}  first token {}  reasoning {:.2} u/s  content {:.2} u/s  total {:.2} u/s",
            status,
            metrics.first_token_cell(),
            snapshot.reasoning_throughput,
            snapshot.content_throughput,
            snapshot.total_throughput
        ),
        (_, None) => status.to_string(),
    }
}
