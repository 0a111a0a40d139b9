// src/cli/mod.rs
pub mod args;
pub mod commands;
pub mod error;

use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed CLI command against the service container.
pub fn execute_command(cli: Cli, services: &ServiceContainer, settings: &Settings) -> CliResult<()> {
    match cli.command {
        Commands::Ingest { file, is_json } => commands::ingest(services, &file, is_json),
        Commands::Search {
            query,
            limit,
            folder,
            domain,
            date_from,
            date_to,
            is_json,
        } => commands::search(
            services,
            settings,
            &query,
            limit,
            folder,
            domain,
            date_from.as_deref(),
            date_to.as_deref(),
            is_json,
        ),
        Commands::List => commands::list(services),
        Commands::Info { url } => commands::info(services, &url),
    }
}
