use clap::Subcommand;
use sqlx::PgPool;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check the database connection
    Ping,
    /// Apply pending migrations
    Migrate,
}

pub(crate) async fn run(pool: &PgPool, command: &DbCommands) -> anyhow::Result<bool> {
    match command {
        DbCommands::Ping => {
            agency_db::ping(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = agency_db::run_migrations(pool).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
        }
    }
    Ok(true)
}
