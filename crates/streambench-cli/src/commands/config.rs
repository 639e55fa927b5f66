//! Configuration management commands

use anyhow::{Result, bail};
use colored::*;
use std::path::Path;
use streambench_core::BenchConfig;
use streambench_core::config::{load_from_file, save_to_file};

use crate::console::CliConsole;

/// Write the default configuration
pub fn init(path: &Path, force: bool) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Initialization");

    if path.exists() && !force {
        console.info("Use --force to overwrite");
        bail!("Configuration file already exists: {}", path.display());
    }

    save_to_file(&BenchConfig::default(), path)?;
    console.success(&format!("Created configuration file: {}", path.display()));
    console.info("Set the API key of each endpoint, or export the variable named in api_key_env");
    Ok(())
}

/// Show the configuration with masked credentials
pub fn show(path: &Path) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    if path.exists() {
        console.success(&format!("Loaded configuration from: {}", path.display()));
    } else {
        console.warn(&format!("Configuration file not found: {}", path.display()));
        console.info("Showing default configuration");
    }
    let config = load_from_file(path)?;
    print_config(&console, &config);
    Ok(())
}

/// Load and validate a configuration file
pub fn validate(path: &Path) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Validation");

    if !path.exists() {
        bail!("Configuration file not found: {}", path.display());
    }

    let config = load_from_file(path)?;
    console.success("Configuration file loaded successfully");
    config.validate()?;
    console.success("Configuration is valid");

    let enabled = config.enabled_endpoints().count();
    console.print_field("Endpoints", &config.endpoints.len().to_string());
    console.print_field("Enabled", &enabled.to_string());
    if enabled == 0 {
        console.warn("No endpoint is enabled; `streambench run` will refuse to start");
    }
    Ok(())
}

fn print_config(console: &CliConsole, config: &BenchConfig) {
    console.print_field("Prompt", &config.prompt);
    console.print_field(
        "Token count",
        &format!("{} ({})", config.token_count, config.token_count.description()),
    );
    console.print_field(
        "Logging",
        &format!("{} / {}", config.logging.level, config.logging.format),
    );

    println!();
    println!("{}", "Endpoints".bold());
    for endpoint in &config.endpoints {
        let state = if endpoint.enabled {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        println!(
            "  {} {} {}",
            format!("[{}]", endpoint.id).cyan(),
            endpoint.name.bold(),
            state
        );
        console.print_field("  Base URL", &endpoint.base_url);
        console.print_field("  Model", &endpoint.model);
        console.print_field("  API key", &endpoint.masked_api_key());
    }
}
