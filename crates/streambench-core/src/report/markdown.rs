//! Markdown report generation

use super::RunReport;

/// Width in characters of a full ranking bar
const BAR_CHARS: usize = 20;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generate a Markdown report
    pub fn generate(report: &RunReport) -> String {
        let mut md = String::new();

        md.push_str("# Streaming Benchmark Report\n\n");

        md.push_str("## Overview\n\n");
        if let Some(run_id) = report.run_id {
            md.push_str(&format!("- **Run**: `{}`\n", run_id));
        }
        md.push_str(&format!(
            "- **Started**: {}\n",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        md.push_str(&format!("- **Duration**: {:.2}s\n", report.duration_secs()));
        md.push_str(&format!(
            "- **Token counting**: {} ({})\n",
            report.token_count,
            report.token_count.description()
        ));
        md.push_str(&format!("- **Prompt**: {}\n\n", report.prompt.trim()));

        md.push_str("## Results\n\n");
        md.push_str("| Endpoint | Model | First token (s) | Reasoning (u/s) | Content (u/s) | Total (u/s) | Elapsed (s) | Status |\n");
        md.push_str("|----------|-------|-----------------|-----------------|---------------|-------------|-------------|--------|\n");
        for row in &report.rows {
            md.push_str(&format!(
                "| {} | `{}` | {} | {} | {} | {} | {} | {} |\n",
                escape_cell(&row.display_name),
                row.model_identifier,
                row.first_token_latency_seconds,
                row.reasoning_throughput,
                row.content_throughput,
                row.total_throughput,
                row.total_elapsed_seconds,
                row.status
            ));
        }
        md.push('\n');

        md.push_str("## Ranking\n\n");
        if report.ranking.is_empty() {
            md.push_str("_No endpoint finished successfully._\n\n");
        } else {
            md.push_str("| Rank | Endpoint | Total (u/s) | |\n");
            md.push_str("|------|----------|-------------|---|\n");
            for entry in &report.ranking {
                let filled = (entry.bar_width * BAR_CHARS as f64).round() as usize;
                md.push_str(&format!(
                    "| {} | {} | {:.2} | `{}` |\n",
                    entry.badge(),
                    escape_cell(&entry.display_name),
                    entry.total_throughput,
                    "█".repeat(filled.max(1))
                ));
            }
            md.push('\n');
        }

        md.push_str("## Responses\n\n");
        for (id, response) in &report.responses {
            let name = report.name_of(*id).unwrap_or("unknown");
            md.push_str(&format!("### {}\n\n", name));
            if !response.reasoning.is_empty() {
                md.push_str("<details>\n<summary>Reasoning</summary>\n\n");
                md.push_str(&format!("{}\n\n</details>\n\n", response.reasoning.trim()));
            }
            md.push_str(&format!("{}\n\n", response.content.trim()));
        }

        md
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
