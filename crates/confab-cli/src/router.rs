//! Command routing logic for CLI

use confab_core::error::ConfabResult;

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI commands to their respective stage handlers
pub async fn route(cli: Cli) -> ConfabResult<()> {
    match cli.command {
        Commands::Normalize(args) => commands::normalize::run(args).await,
        Commands::Store(args) => commands::store::run(args).await,
        Commands::Get(args) => commands::get::run(args).await,
        Commands::List(args) => commands::list::run(args).await,
        Commands::Invalidate(args) => commands::invalidate::run(args).await,
        Commands::Render => commands::render::run().await,
    }
}
