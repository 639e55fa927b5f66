//! Plain-text table report

use super::RunReport;

const HEADERS: [&str; 8] = [
    "Endpoint",
    "Model",
    "First token (s)",
    "Reasoning (u/s)",
    "Content (u/s)",
    "Total (u/s)",
    "Elapsed (s)",
    "Status",
];

/// Fixed-width text table, suitable for files and pipes
pub struct TextReporter;

impl TextReporter {
    pub fn generate(report: &RunReport) -> String {
        let rows: Vec<[String; 8]> = report
            .rows
            .iter()
            .map(|row| {
                [
                    row.display_name.clone(),
                    row.model_identifier.clone(),
                    row.first_token_latency_seconds.to_string(),
                    row.reasoning_throughput.to_string(),
                    row.content_throughput.to_string(),
                    row.total_throughput.to_string(),
                    row.total_elapsed_seconds.to_string(),
                    row.status.to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        output.push_str(&format_line(&HEADERS.map(String::from), &widths));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&rule.join("-+-"));
        output.push('\n');
        for row in &rows {
            output.push_str(&format_line(row, &widths));
        }

        if !report.ranking.is_empty() {
            output.push_str("\nRanking by total throughput\n");
            for entry in &report.ranking {
                output.push_str(&format!(
                    "{:>4}  {}  {:.2} u/s\n",
                    entry.badge(),
                    entry.display_name,
                    entry.total_throughput
                ));
            }
        }
        output
    }
}

fn format_line(cells: &[String; 8], widths: &[usize; 8]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}
