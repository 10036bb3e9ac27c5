//! PhysioDash CLI
//!
//! Command-line interface and terminal dashboard for the curated
//! PhysioNet dataset collection.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use physidash_core::{Config, DocumentSource, FallbackCache, RefreshOutcome};

mod clipboard;
mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "physidash")]
#[command(about = "PhysioDash - curated PhysioNet dataset dashboard")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides PHYSIDASH_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard TUI
    Tui,
    /// List curated datasets
    #[command(alias = "ls")]
    List {
        /// Filter by title, condition, modality, or keyword
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show dataset details
    Show {
        /// Dataset ID (full or prefix)
        id: String,
    },
    /// Export the collection to a file
    Export {
        /// Output format (json, csv, md)
        format: String,
        /// Output directory (defaults to the configured export dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show collection statistics
    Stats,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (source_url, data_dir, refresh_secs, export_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a fetched collection
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;

    // Handle TUI (default when no command given)
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(config).await;
    }

    init_cli_logging();

    // One-shot commands fetch the collection up front
    let records = fetch_collection(&config).await?;

    match cli.command {
        Some(Commands::List { search }) => commands::dataset::list(&records, search, &output),
        Some(Commands::Show { id }) => commands::dataset::show(&records, id, &output),
        Some(Commands::Export { format, output: dir }) => {
            let dir = dir.unwrap_or_else(|| config.effective_export_dir());
            commands::export::run(&records, format, dir, &output)
        }
        Some(Commands::Stats) => commands::stats::show(&records, &output),
        Some(Commands::Config { .. }) | Some(Commands::Tui) | None => unreachable!(),
    }
}

/// Fetch the curated collection, falling back to the local cache
async fn fetch_collection(config: &Config) -> Result<Vec<physidash_core::DatasetRecord>> {
    let source = DocumentSource::new(config)?;
    let cache = FallbackCache::new(config);

    match source.refresh(&cache).await {
        RefreshOutcome::Fresh(records) | RefreshOutcome::Cached(records) => Ok(records),
        RefreshOutcome::Empty => Ok(Vec::new()),
        RefreshOutcome::Unavailable => {
            bail!(
                "Could not reach {} and no cached collection exists",
                source.url()
            )
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Stderr logging for one-shot commands, controlled by PHYSIDASH_LOG
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("PHYSIDASH_LOG") else {
        return;
    };

    let env_filter = tracing_subscriber::EnvFilter::new(format!(
        "physidash_core={},physidash_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
