use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ft_cli::commands::{report, reset, status, track};
use ft_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(ft_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = ft_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Track) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            track::run(db, &config).await?;
        }
        Some(Commands::Status) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            let mut stdout = std::io::stdout().lock();
            status::run(&mut stdout, &db, Utc::now())?;
        }
        Some(Commands::Report { days, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            let mut stdout = std::io::stdout().lock();
            report::run(&mut stdout, &db, *days, *json, Utc::now().date_naive())?;
        }
        Some(Commands::Reset { yes }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            let mut stdout = std::io::stdout().lock();
            let stdin = std::io::stdin();
            reset::run(&mut stdout, &mut stdin.lock(), &db, *yes, Utc::now())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
