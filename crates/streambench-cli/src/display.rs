//! Terminal rendering of results, ranking and responses

use colored::*;
use console::{Alignment, measure_text_width, pad_str};
use streambench_core::{RankedEntry, ResultTable};

use crate::console::status_label;

/// Width in terminal columns of a full ranking bar
const BAR_COLUMNS: usize = 30;

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

/// Columns right-aligned because they hold numbers
const NUMERIC: [bool; 8] = [false, false, true, true, true, true, true, false];

/// Results table with colored statuses; widths follow display width so CJK
/// names line up
pub fn render_results(table: &ResultTable) -> String {
    let rows: Vec<[String; 8]> = table
        .rows
        .iter()
        .map(|row| {
            let view = row.view();
            let cell = |text: String| {
                if view.status == streambench_core::EndpointStatus::Error {
                    text.red().to_string()
                } else {
                    text
                }
            };
            [
                view.display_name.bold().to_string(),
                view.model_identifier.dimmed().to_string(),
                cell(view.first_token_latency_seconds.to_string()),
                cell(view.reasoning_throughput.to_string()),
                cell(view.content_throughput.to_string()),
                cell(view.total_throughput.to_string()),
                cell(view.total_elapsed_seconds.to_string()),
                status_label(view.status).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(measure_text_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let mut output = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.bold().to_string()).collect();
    output.push_str(&render_line(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&format!("{}\n", rule.join("─┼─").dimmed()));
    for row in &rows {
        output.push_str(&render_line(row, &widths));
    }
    output
}

fn render_line(cells: &[String], widths: &[usize; 8]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(NUMERIC)
        .map(|((cell, width), numeric)| {
            let align = if numeric {
                Alignment::Right
            } else {
                Alignment::Left
            };
            pad_str(cell, *width, align, None).into_owned()
        })
        .collect();
    format!("{}\n", padded.join(" │ ").trim_end())
}

/// Horizontal bar chart of the ranking
pub fn render_ranking(ranking: &[RankedEntry]) -> String {
    if ranking.is_empty() {
        return format!("{}\n", "No endpoint finished successfully.".dimmed());
    }

    let name_width = ranking
        .iter()
        .map(|e| measure_text_width(&e.display_name))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for entry in ranking {
        let filled = ((entry.bar_width * BAR_COLUMNS as f64).round() as usize).max(1);
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(BAR_COLUMNS.saturating_sub(filled))
        );
        let bar = match entry.position {
            1 => bar.green(),
            2 | 3 => bar.cyan(),
            _ => bar.blue(),
        };
        let latency = entry
            .first_token_latency
            .map_or_else(|| "N/A".to_string(), |v| format!("{:.2}s", v));
        output.push_str(&format!(
            "{} {} {} {:>8.2} u/s  {}\n",
            pad_str(&entry.badge(), 3, Alignment::Left, None),
            pad_str(&entry.display_name, name_width, Alignment::Left, None),
            bar,
            entry.total_throughput,
            format!("first token {}", latency).dimmed()
        ));
    }
    output
}

/// Reasoning and content per endpoint, in table order
pub fn render_responses(table: &ResultTable) -> String {
    let mut output = String::new();
    for row in &table.rows {
        let Some(response) = table.response(row.endpoint_id) else {
            continue;
        };
        output.push_str(&format!(
            "\n{} {}\n",
            row.name.bold().underline(),
            format!("({})", row.model).dimmed()
        ));
        if !response.reasoning.is_empty() {
            output.push_str(&format!("{}\n", "Reasoning".italic().dimmed()));
            for line in response.reasoning.trim().lines() {
                output.push_str(&format!("  {}\n", line.dimmed()));
            }
        }
        if !response.content.is_empty() {
            let content = response.content.trim();
            if row.status == streambench_core::EndpointStatus::Error {
                output.push_str(&format!("{}\n", content.red()));
            } else {
                output.push_str(&format!("{}\n", content));
            }
        }
    }
    output
}
