//! Command routing logic for CLI

use anyhow::Result;

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::Config { action } => match action {
            ConfigAction::Init { config, force } => commands::config::init(&config, force),
            ConfigAction::Show { config } => commands::config::show(&config),
            ConfigAction::Validate { config } => commands::config::validate(&config),
        },
    }
}
