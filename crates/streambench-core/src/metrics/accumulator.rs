//! Incremental metrics for one endpoint's stream
//!
//! The accumulator holds no clock of its own: every observation carries its
//! timestamp. Replaying the same `(delta, now)` sequence from the same start
//! therefore always yields the same snapshots.

use super::snapshot::MetricsSnapshot;
use super::token_counter::{TokenCountPolicy, count};
use crate::llm::Delta;
use crate::types::ResponseText;

/// Counts and active window of one delta category
#[derive(Debug, Clone, Default)]
struct CategoryWindow {
    units: u64,
    first_at: Option<u64>,
    last_at: u64,
}

impl CategoryWindow {
    fn record(&mut self, units: u64, now: u64) {
        self.units += units;
        if self.first_at.is_none() {
            self.first_at = Some(now);
        }
        self.last_at = now;
    }

    fn width_millis(&self) -> u64 {
        self.first_at.map_or(0, |first| self.last_at.saturating_sub(first))
    }

    fn throughput(&self) -> f64 {
        per_second(self.units, self.width_millis())
    }
}

/// Units per second over a window in milliseconds; zero for an empty window
fn per_second(units: u64, window_millis: u64) -> f64 {
    if window_millis == 0 {
        return 0.0;
    }
    units as f64 * 1000.0 / window_millis as f64
}

fn seconds(millis: u64) -> f64 {
    millis as f64 / 1000.0
}

/// Mutable metrics state of one endpoint during one run
#[derive(Debug, Clone)]
pub struct MetricsAccumulator {
    start: u64,
    first_token_at: Option<u64>,
    reasoning: CategoryWindow,
    content: CategoryWindow,
    response: ResponseText,
    snapshot: MetricsSnapshot,
}

impl MetricsAccumulator {
    /// Start accumulating; `start_millis` is the moment the request was issued
    pub fn new(start_millis: u64) -> Self {
        Self {
            start: start_millis,
            first_token_at: None,
            reasoning: CategoryWindow::default(),
            content: CategoryWindow::default(),
            response: ResponseText::default(),
            snapshot: MetricsSnapshot::default(),
        }
    }

    /// Fold one delta observed at `now` into the metrics.
    ///
    /// `Empty` deltas leave every field untouched.
    pub fn observe(
        &mut self,
        delta: &Delta,
        now: u64,
        policy: TokenCountPolicy,
    ) -> MetricsSnapshot {
        let (window, text, fragment) = match delta {
            Delta::Empty => return self.snapshot,
            Delta::Reasoning(fragment) => {
                (&mut self.reasoning, &mut self.response.reasoning, fragment)
            }
            Delta::Content(fragment) => (&mut self.content, &mut self.response.content, fragment),
        };
        if fragment.is_empty() {
            return self.snapshot;
        }

        window.record(count(fragment, policy), now);
        text.push_str(fragment);

        if self.first_token_at.is_none() {
            self.first_token_at = Some(now);
        }

        self.recompute(now);
        self.snapshot
    }

    /// Refresh the elapsed totals at end of stream.
    ///
    /// Category windows and first-token latency are left as they are.
    pub fn finish(&mut self, now: u64) -> MetricsSnapshot {
        self.recompute(now);
        self.snapshot
    }

    fn recompute(&mut self, now: u64) {
        let elapsed_millis = now.saturating_sub(self.start);
        let total_units = self.reasoning.units + self.content.units;

        self.snapshot = MetricsSnapshot {
            first_token_latency: self
                .first_token_at
                .map(|at| seconds(at.saturating_sub(self.start))),
            reasoning_throughput: self.reasoning.throughput(),
            content_throughput: self.content.throughput(),
            total_throughput: per_second(total_units, elapsed_millis),
            total_elapsed: seconds(elapsed_millis),
            reasoning_units: self.reasoning.units,
            content_units: self.content.units,
        };
    }

    /// The latest snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot
    }

    /// Text accumulated so far
    pub fn response(&self) -> &ResponseText {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn reasoning_then_content() -> Vec<(Delta, u64)> {
        vec![
            (Delta::Reasoning("A".into()), 100),
            (Delta::Reasoning("BC".into()), 300),
            (Delta::Content("X".into()), 500),
            (Delta::Content("YZ".into()), 800),
        ]
    }

    fn replay(policy: TokenCountPolicy) -> (MetricsAccumulator, Vec<MetricsSnapshot>) {
        let mut acc = MetricsAccumulator::new(0);
        let snapshots = reasoning_then_content()
            .iter()
            .map(|(delta, at)| acc.observe(delta, *at, policy))
            .collect();
        (acc, snapshots)
    }

    #[test]
    fn test_char_policy_throughput() {
        let (mut acc, _) = replay(TokenCountPolicy::Char);
        let s = acc.finish(1_000);

        assert!((s.first_token_latency.unwrap() - 0.10).abs() < EPS);
        assert!((s.reasoning_throughput - 15.0).abs() < EPS);
        assert!((s.content_throughput - 10.0).abs() < EPS);
        assert!((s.total_throughput - 6.0).abs() < EPS);
        assert!((s.total_elapsed - 1.0).abs() < EPS);
        assert_eq!(s.reasoning_units, 3);
        assert_eq!(s.content_units, 3);
        assert_eq!(acc.response().reasoning, "ABC");
        assert_eq!(acc.response().content, "XYZ");
    }

    #[test]
    fn test_chunk_policy_throughput() {
        let (mut acc, _) = replay(TokenCountPolicy::Chunk);
        let s = acc.finish(1_000);

        assert!((s.reasoning_throughput - 10.0).abs() < EPS);
        assert!((s.content_throughput - 2.0 / 0.3).abs() < 1e-6);
        assert_eq!(format!("{:.2}", s.content_throughput), "6.67");
        assert!((s.total_throughput - 4.0).abs() < EPS);
    }

    #[test]
    fn test_first_token_latency_set_once() {
        let (_, snapshots) = replay(TokenCountPolicy::Char);
        for snapshot in &snapshots {
            assert!((snapshot.first_token_latency.unwrap() - 0.10).abs() < EPS);
        }
    }

    #[test]
    fn test_single_delta_has_zero_window() {
        let mut acc = MetricsAccumulator::new(0);
        let s = acc.observe(&Delta::Reasoning("abc".into()), 250, TokenCountPolicy::Char);

        assert_eq!(s.reasoning_throughput, 0.0);
        assert_eq!(s.content_throughput, 0.0);
        assert!((s.total_throughput - 12.0).abs() < EPS);
    }

    #[test]
    fn test_reasoning_throughput_zero_without_reasoning() {
        let mut acc = MetricsAccumulator::new(0);
        for (i, text) in ["a", "bb", "ccc"].iter().enumerate() {
            let at = 100 * (i as u64 + 1);
            let s = acc.observe(&Delta::Content((*text).into()), at, TokenCountPolicy::Char);
            assert_eq!(s.reasoning_throughput, 0.0);
        }
        assert_eq!(acc.finish(10_000).reasoning_throughput, 0.0);
    }

    #[test]
    fn test_zero_elapsed_never_produces_nan() {
        let mut acc = MetricsAccumulator::new(500);
        let s = acc.observe(&Delta::Content("hi".into()), 500, TokenCountPolicy::Char);
        assert_eq!(s.total_elapsed, 0.0);
        assert_eq!(s.total_throughput, 0.0);
        assert!(!s.total_throughput.is_nan());
        assert_eq!(s.first_token_latency, Some(0.0));
    }

    #[test]
    fn test_empty_delta_is_a_no_op() {
        let mut acc = MetricsAccumulator::new(0);
        acc.observe(&Delta::Content("x".into()), 100, TokenCountPolicy::Char);
        let before = acc.snapshot();

        let after = acc.observe(&Delta::Empty, 900, TokenCountPolicy::Char);
        assert_eq!(before, after);
        let after = acc.observe(&Delta::Content(String::new()), 900, TokenCountPolicy::Char);
        assert_eq!(before, after);
    }

    #[test]
    fn test_empty_delta_does_not_set_first_token() {
        let mut acc = MetricsAccumulator::new(0);
        let s = acc.observe(&Delta::Empty, 100, TokenCountPolicy::Char);
        assert_eq!(s.first_token_latency, None);
    }

    #[test]
    fn test_throughput_times_elapsed_equals_units() {
        let (mut acc, _) = replay(TokenCountPolicy::Char);
        let s = acc.finish(1_370);
        let reconstructed = s.total_throughput * s.total_elapsed;
        assert!((reconstructed - s.total_units() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let (_, first) = replay(TokenCountPolicy::Char);
        let (_, second) = replay(TokenCountPolicy::Char);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
