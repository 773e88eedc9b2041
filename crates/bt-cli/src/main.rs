use std::path::Path;

use anyhow::{Context, Result};
use bt_core::Tracker;
use bt_db::Database;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::{
    clear, export, import, list, log, profile, remove, status, summary, util, week,
};
use bt_cli::{Cli, Commands, Config};

/// Load config and open the tracker, ensuring the database directory exists.
fn open_tracker(config_path: Option<&Path>) -> Result<(Tracker<Database>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((Tracker::load(db), config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut tracker, config) = open_tracker(cli.config.as_deref())?;
    let now = Local::now();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Log { kind, at } => {
            log::run(&mut out, &mut tracker, kind, at.as_deref(), &now)?;
        }
        Commands::Remove { id } => {
            remove::run(&mut out, &mut tracker, &id)?;
        }
        Commands::List { limit } => {
            list::run(&mut out, &tracker, limit.or(config.list_limit))?;
        }
        Commands::Today { json } => {
            summary::run(&mut out, &tracker, now.date_naive(), json, &now)?;
        }
        Commands::Day { date, json } => {
            let day = util::parse_day(&date, now.date_naive())?;
            summary::run(&mut out, &tracker, day, json, &now)?;
        }
        Commands::Week { offset, json } => {
            week::run(&mut out, &tracker, offset, json, &now)?;
        }
        Commands::Export { output, json } => {
            export::run(&mut out, &tracker, output.as_deref(), json, &now)?;
        }
        Commands::Import { path } => {
            import::run(&mut out, &mut tracker, &path)?;
        }
        Commands::Clear { yes } => {
            clear::run(&mut out, &mut tracker, yes)?;
        }
        Commands::Profile { name, feeding_type } => {
            profile::run(&mut out, &mut tracker, name.as_deref(), feeding_type)?;
        }
        Commands::Status => status::run(&mut out, &tracker, &config.database_path, &now)?,
    }

    Ok(())
}
