//! CLI for imgfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgfetch_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_show_config, FetchOverrides};

/// Top-level CLI for imgfetch.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "imgfetch: fetch, validate and store images from URLs", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/imgfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch images. Without URLs, reads them from stdin until a line containing only `done`.
    Fetch {
        /// Image URLs (whitespace or comma separated).
        urls: Vec<String>,

        /// Directory to store images in (default: Fetched_Images).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Maximum image size in bytes.
        #[arg(long, value_name = "BYTES")]
        max_bytes: Option<u64>,

        /// Per-request timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                urls,
                output_dir,
                max_bytes,
                timeout,
            } => {
                let overrides = FetchOverrides {
                    output_dir,
                    max_bytes,
                    timeout_secs: timeout,
                };
                run_fetch(overrides.apply(cfg), &urls)?;
            }
            CliCommand::Config => run_show_config(cli.config.as_deref(), &cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
