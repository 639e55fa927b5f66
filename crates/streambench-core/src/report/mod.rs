//! Report generation for benchmark runs
//!
//! Generates reports as a plain-text table, JSON or Markdown.

mod json;
mod markdown;
mod text;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use text::TextReporter;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::bench::{RankedEntry, ResultRowView, ResultTable, RunEpoch, rank};
use crate::error::BenchResult;
use crate::metrics::TokenCountPolicy;
use crate::types::{EndpointId, ResponseText};

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "Unknown report format '{}'. Use 'table', 'json' or 'markdown'.",
                other
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Everything known about one finished (or interrupted) run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Option<RunEpoch>,
    pub streambench_version: String,
    pub prompt: String,
    pub token_count: TokenCountPolicy,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows: Vec<ResultRowView>,
    pub ranking: Vec<RankedEntry>,
    pub responses: BTreeMap<EndpointId, ResponseText>,
}

impl RunReport {
    pub fn new(
        table: &ResultTable,
        prompt: impl Into<String>,
        token_count: TokenCountPolicy,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: table.epoch,
            streambench_version: env!("CARGO_PKG_VERSION").to_string(),
            prompt: prompt.into(),
            token_count,
            started_at,
            finished_at,
            rows: table.views(),
            ranking: rank(&table.rows),
            responses: table.responses.clone(),
        }
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Display name of an endpoint in this report
    pub fn name_of(&self, id: EndpointId) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.endpoint_id == id)
            .map(|r| r.display_name.as_str())
    }
}

/// Generate a report in the specified format
pub fn generate_report(report: &RunReport, format: ReportFormat) -> BenchResult<String> {
    match format {
        ReportFormat::Table => Ok(TextReporter::generate(report)),
        ReportFormat::Json => JsonReporter::generate(report),
        ReportFormat::Markdown => Ok(MarkdownReporter::generate(report)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parse() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("table".parse::<ReportFormat>().unwrap(), ReportFormat::Table);
        assert!("html".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_report_contents() {
        let report = fixtures::sample_report();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.ranking.len(), 1);
        assert_eq!(report.ranking[0].endpoint_id, EndpointId(1));
        assert_eq!(report.duration_secs(), 2.0);
        assert_eq!(report.name_of(EndpointId(2)), Some("SiliconFlow"));
    }

    #[test]
    fn test_generate_each_format() {
        let report = fixtures::sample_report();
        for format in [ReportFormat::Table, ReportFormat::Json, ReportFormat::Markdown] {
            let output = generate_report(&report, format).unwrap();
            assert!(output.contains("Bailian"), "{} report", format);
        }
    }
}
