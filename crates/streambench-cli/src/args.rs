//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use streambench_core::config::DEFAULT_CONFIG_FILE;
use streambench_core::{ReportFormat, TokenCountPolicy};

#[derive(Parser)]
#[command(name = "streambench")]
#[command(about = "Benchmark streaming latency and throughput of OpenAI-compatible LLM endpoints")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the prompt to every enabled endpoint and compare the streams
    Run(RunArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML, YAML or JSON)
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Prompt to send instead of the configured one
    #[arg(long, short)]
    pub prompt: Option<String>,

    /// Unit counting policy: `char` counts characters, `chunk` counts deltas
    #[arg(long, short = 't')]
    pub token_count: Option<TokenCountPolicy>,

    /// Only run these endpoint ids (repeatable)
    #[arg(long = "endpoint", short = 'e', value_name = "ID")]
    pub endpoints: Vec<u64>,

    /// Report format: table, json or markdown
    #[arg(long, short, default_value = "table")]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the reasoning and content received from each endpoint
    #[arg(long)]
    pub show_responses: bool,

    /// Disable the live progress display
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Write a configuration file with the default endpoints
    Init {
        /// Path to configuration file
        #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the configuration with API keys masked
    Show {
        /// Path to configuration file
        #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file
        #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "streambench",
            "run",
            "--prompt",
            "hi",
            "-t",
            "chunk",
            "-e",
            "1",
            "-e",
            "3",
            "--format",
            "md",
            "--show-responses",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.prompt.as_deref(), Some("hi"));
        assert_eq!(args.token_count, Some(TokenCountPolicy::Chunk));
        assert_eq!(args.endpoints, vec![1, 3]);
        assert_eq!(args.format, ReportFormat::Markdown);
        assert!(args.show_responses);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["streambench", "run", "--token-count", "words"]);
        assert!(result.is_err());
    }
}
