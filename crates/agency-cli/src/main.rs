use std::process::ExitCode;

use agency_core::{AppConfig, Brief, Post};
use agency_db::PgDocumentStore;
use agency_sync::SyncContext;
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

mod content;
mod db;
mod index;
mod output;
mod signals;

use content::ContentCommands;
use db::DbCommands;
use index::IndexCommands;
use signals::SignalsCommands;

/// Exit status for configuration problems, reported before any I/O.
const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "agency")]
#[command(about = "Sync signals, briefs and posts between local files and the remote store")]
struct Cli {
    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Harvested research signals, deduplicated by url
    Signals {
        #[command(subcommand)]
        command: SignalsCommands,
    },
    /// Content briefs
    Briefs {
        #[command(subcommand)]
        command: ContentCommands,
    },
    /// Finished posts
    Posts {
        #[command(subcommand)]
        command: ContentCommands,
    },
    /// Category index documents
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match agency_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            output::print_error("configuration error", &e.to_string(), cli.json);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_tracing(&config) {
        output::print_error("configuration error", &format!("{e:#}"), cli.json);
        return ExitCode::from(EXIT_CONFIG);
    }

    match run(&cli, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            output::print_error("error", &format!("{e:#}"), cli.json);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Run the selected command. `Ok(false)` means the command completed but some
/// item failed (or, for `signals check`, the url already exists).
async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<bool> {
    tracing::debug!(env = %config.env, tenant = %config.tenant_id, "starting");
    let pool = agency_db::connect_from_config(config).await?;
    let json = cli.json;

    match &cli.command {
        Commands::Db { command } => db::run(&pool, command).await,
        Commands::Signals { command } => {
            signals::run(&sync_context(pool, config), command, json).await
        }
        Commands::Briefs { command } => {
            content::run::<Brief, _>(&sync_context(pool, config), command, json).await
        }
        Commands::Posts { command } => {
            content::run::<Post, _>(&sync_context(pool, config), command, json).await
        }
        Commands::Index { command } => {
            index::run(&sync_context(pool, config), command, json).await
        }
    }
}

fn sync_context(pool: PgPool, config: &AppConfig) -> SyncContext<PgDocumentStore> {
    SyncContext::from_app_config(PgDocumentStore::new(pool), config)
}

#[cfg(test)]
mod tests;
