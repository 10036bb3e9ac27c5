//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use physidash_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "source_url": config.source_url,
                    "data_dir": config.data_dir,
                    "refresh_secs": config.refresh_secs,
                    "export_dir": config.export_dir,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  source_url:   {}", config.source_url);
            println!("  data_dir:     {}", config.data_dir.display());
            println!("  refresh_secs: {}", config.refresh_secs);
            println!(
                "  export_dir:   {}",
                config
                    .export_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(current directory)".to_string())
            );
            println!(
                "  log_file:     {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Document URL: {}", config.document_url());
            println!("Config file:  {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match key.as_str() {
        "source_url" => {
            config.source_url = value.clone();
        }
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "refresh_secs" => {
            config.refresh_secs = value
                .parse()
                .context("Invalid value for refresh_secs. Use a number of seconds.")?;
        }
        "export_dir" => {
            config.export_dir = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: source_url, data_dir, refresh_secs, export_dir, log_file",
                key
            );
        }
    }

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
