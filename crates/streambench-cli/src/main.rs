//! Streambench command-line interface
//!
//! Races one prompt against several OpenAI-compatible endpoints and reports
//! first-token latency and streaming throughput for each.
//!
//! ```bash
//! streambench config init                 # write streambench.toml
//! streambench run                         # benchmark every enabled endpoint
//! streambench run -e 1 -e 3 --format json # only endpoints 1 and 3, JSON to stdout
//! ```

mod args;
mod commands;
mod console;
mod display;
mod logging;
mod progress;
mod router;

use clap::Parser;
use std::process::ExitCode;

use crate::args::Cli;
use crate::console::CliConsole;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match router::route(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            CliConsole::new(false).error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
