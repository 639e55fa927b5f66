//! The `run` command: benchmark every enabled endpoint

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use streambench_core::config::load_from_file;
use streambench_core::{
    BenchConfig, EndpointId, OpenAiCompatClient, Orchestrator, ReportFormat, ResultTable,
    RunReport, generate_report,
};

use crate::args::RunArgs;
use crate::console::CliConsole;
use crate::display::{render_ranking, render_responses, render_results};
use crate::logging;
use crate::progress::LiveProgress;

/// Load the configuration the run will use, with command-line overrides
fn prepare_config(args: &RunArgs) -> Result<BenchConfig> {
    let mut config = load_from_file(&args.config)?;
    config.validate()?;

    if let Some(prompt) = &args.prompt {
        config.prompt = prompt.clone();
    }
    if let Some(policy) = args.token_count {
        config.token_count = policy;
    }
    let ids: Vec<EndpointId> = args.endpoints.iter().copied().map(EndpointId).collect();
    config.restrict_to(&ids)?;

    Ok(config.resolve_api_keys_with(|name| std::env::var(name).ok()))
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = prepare_config(&args)?;
    logging::init(&config.logging, args.verbose);
    let console = CliConsole::new(args.verbose);

    let client = OpenAiCompatClient::new()?;
    let orchestrator = Orchestrator::new(Arc::new(client));

    let started_at = Utc::now();
    let handle = orchestrator.run(&config.endpoints, &config.prompt, config.token_count)?;
    console.info(&format!(
        "Run {} started against {} endpoint(s)",
        handle.epoch().short(),
        config.enabled_endpoints().count()
    ));

    let show_progress = !args.no_progress && std::io::stderr().is_terminal();
    let progress = show_progress.then(|| LiveProgress::new(config.enabled_endpoints()));
    let mut updates = orchestrator.subscribe();

    let mut finished = std::pin::pin!(handle.wait());
    let mut interrupted = std::pin::pin!(tokio::signal::ctrl_c());
    let table = loop {
        tokio::select! {
            result = &mut finished => break result?,
            changed = updates.changed(), if progress.is_some() => {
                if changed.is_ok() {
                    if let Some(progress) = &progress {
                        progress.update(&updates.borrow_and_update());
                    }
                }
            }
            _ = &mut interrupted => {
                console.warn("Interrupted, showing results received so far");
                break orchestrator.table();
            }
        }
    };
    let finished_at = Utc::now();

    if let Some(progress) = progress {
        progress.finish();
    }

    let report = RunReport::new(
        &table,
        config.prompt.clone(),
        config.token_count,
        started_at,
        finished_at,
    );

    let machine_output = args.output.is_none() && args.format != ReportFormat::Table;
    if machine_output {
        println!("{}", generate_report(&report, args.format)?);
        return Ok(());
    }

    print_human(&table, &report, args.show_responses);

    if let Some(path) = &args.output {
        write_report(&report, args.format, path)?;
        console.success(&format!("Report written to {}", path.display()));
    }
    Ok(())
}

fn print_human(table: &ResultTable, report: &RunReport, show_responses: bool) {
    println!();
    println!("{}", "Results".bold().underline());
    print!("{}", render_results(table));

    println!();
    println!("{}", "Ranking by total throughput".bold().underline());
    print!("{}", render_ranking(&report.ranking));

    if show_responses {
        println!();
        println!("{}", "Responses".bold().underline());
        print!("{}", render_responses(table));
    }

    println!();
    println!(
        "{}",
        format!(
            "{} done, {} failed in {:.2}s ({} counting)",
            table.count_with(streambench_core::EndpointStatus::Done),
            table.count_with(streambench_core::EndpointStatus::Error),
            report.duration_secs(),
            report.token_count
        )
        .dimmed()
    );
}

fn write_report(report: &RunReport, format: ReportFormat, path: &Path) -> Result<()> {
    let content = generate_report(report, format)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
