//! CLI for MMV.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mmv_core::config::{self, MmvConfig, RowFailurePolicy};

use commands::{run_local, run_remote, show_config};

/// Top-level CLI for MMV.
#[derive(Debug, Parser)]
#[command(name = "mmv")]
#[command(about = "MMV: fetch two remote matrices, multiply them and verify the product digest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch datasets A and B from the service, multiply, and submit the digest.
    Run {
        /// Base URL of the numbers service (overrides config).
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Dataset dimension N (overrides config).
        #[arg(long, value_name = "N")]
        dimension: Option<usize>,
        /// Row fetches in flight per dataset (overrides config).
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
        /// Abort on a failed init or any failed row instead of zero-filling.
        #[arg(long)]
        strict: bool,
        /// Attempts per row, including the first. 1 disables retries.
        #[arg(long, value_name = "N")]
        retries: Option<u32>,
    },

    /// Multiply generated datasets locally and print the digest (no network).
    Local {
        /// Dataset dimension N (overrides config).
        #[arg(long, value_name = "N")]
        dimension: Option<usize>,
        /// Multiplication threads (overrides config).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
    },

    /// Show the config file path and effective settings.
    Config,
}

/// Command-line overrides for a remote run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunOverrides {
    pub base_url: Option<String>,
    pub dimension: Option<usize>,
    pub concurrency: Option<usize>,
    pub strict: bool,
    pub retries: Option<u32>,
}

impl RunOverrides {
    /// Layer flags over the loaded config. `--retries` keeps the configured
    /// backoff delays and only replaces the attempt count.
    pub fn apply(self, mut cfg: MmvConfig) -> MmvConfig {
        if let Some(url) = self.base_url {
            cfg.base_url = url;
        }
        if let Some(n) = self.dimension {
            cfg.dimension = n;
        }
        if let Some(n) = self.concurrency {
            cfg.concurrency = n;
        }
        if self.strict {
            cfg.row_failure_policy = RowFailurePolicy::Strict;
        }
        match self.retries {
            Some(0) | Some(1) => cfg.retry = None,
            Some(n) => {
                let mut retry = cfg.retry.take().unwrap_or_default();
                retry.max_attempts = n;
                cfg.retry = Some(retry);
            }
            None => {}
        }
        cfg
    }
}

impl CliCommand {
    /// Parses arguments and runs the command. `Ok(false)` means the command
    /// completed but the run did not pass.
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                base_url,
                dimension,
                concurrency,
                strict,
                retries,
            } => {
                let overrides = RunOverrides {
                    base_url,
                    dimension,
                    concurrency,
                    strict,
                    retries,
                };
                run_remote(overrides.apply(cfg)).await
            }
            CliCommand::Local { dimension, workers } => {
                run_local(
                    dimension.unwrap_or(cfg.dimension),
                    workers.or(cfg.multiply_workers),
                )
                .await?;
                Ok(true)
            }
            CliCommand::Config => {
                show_config(&cfg)?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests;
