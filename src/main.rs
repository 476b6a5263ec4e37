use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{init_tracing, load_config, ServerOverrides};
use database::{connect, run_migrations, DbRepository, SeedOutcome};
use std::path::PathBuf;

/// The main entry point for the campus events backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be populated.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(overrides) => {
            overrides.apply(&mut config.server);
            web_server::run_server(config).await?;
        }
        Commands::Migrate => {
            let db_pool = connect(&config.database)
                .await
                .context("Failed to connect to the database")?;
            run_migrations(&db_pool).await?;
            tracing::info!("Migrations applied.");
        }
        Commands::Seed => {
            let db_pool = connect(&config.database)
                .await
                .context("Failed to connect to the database")?;
            run_migrations(&db_pool).await?;
            match DbRepository::new(db_pool).seed_sample_data().await? {
                SeedOutcome::Inserted => println!("Sample data inserted."),
                SeedOutcome::Skipped => println!("Skipped: already seeded."),
            }
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Campus event management backend: colleges, students, events and participation reports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./campus-events.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServerOverrides),
    /// Apply database migrations and exit.
    Migrate,
    /// Insert sample data unless a college already exists.
    Seed,
}
