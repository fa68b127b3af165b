//! `index` command handlers.

use agency_core::Category;
use agency_db::DocumentStore;
use agency_sync::{list_index, rebuild_index, SyncContext};
use clap::Subcommand;

use crate::output;

/// Sub-commands available under `index`.
#[derive(Debug, Subcommand)]
pub enum IndexCommands {
    /// Rebuild a category index from a full scan of its documents
    Rebuild {
        /// briefs or posts
        category: Category,
        /// Compute the index without writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a category index
    Show {
        /// briefs or posts
        category: Category,
    },
}

pub(crate) async fn run<S: DocumentStore>(
    ctx: &SyncContext<S>,
    command: &IndexCommands,
    json: bool,
) -> anyhow::Result<bool> {
    let index = match command {
        IndexCommands::Rebuild { category, dry_run } => {
            rebuild_index(ctx, *category, *dry_run).await?
        }
        IndexCommands::Show { category } => list_index(ctx, *category).await?,
    };
    output::print_index(&index, json)?;
    Ok(true)
}
