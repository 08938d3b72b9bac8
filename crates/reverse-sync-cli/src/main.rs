mod artifacts;
mod commands;
mod converter;
mod source;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{PlanArgs, VerifyArgs};
use reverse_sync_config::Config;
use reverse_sync_engine::SyncStatus;
use std::path::PathBuf;
use std::process::ExitCode;

/// Round-trips MDX edits back into Confluence storage markup
#[derive(Parser, Debug)]
#[command(name = "reverse-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/reverse-sync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `reverse_sync_engine=trace`; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Patch the page markup and verify the roundtrip against the edited text
    Verify(VerifyArgs),

    /// Print the patches the edit would produce
    Plan(PlanArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(filter) = &cli.log_level {
        logger.parse_filters(filter);
    }
    logger.init();

    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path)? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        None => {
            log::debug!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
    };

    match cli.command {
        Command::Verify(args) => {
            let status = commands::verify(args, &config)?;
            Ok(match status {
                SyncStatus::Fail => ExitCode::FAILURE,
                SyncStatus::Pass | SyncStatus::NoChanges => ExitCode::SUCCESS,
            })
        }
        Command::Plan(args) => {
            commands::plan(args, &config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
