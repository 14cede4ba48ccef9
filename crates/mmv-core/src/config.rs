use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PipelineError;

/// Retry policy parameters (optional `[retry]` section in config.toml).
/// Absent means no retries, matching the service's reference client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per row (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 10,
        }
    }
}

/// What to do when some rows could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFailurePolicy {
    /// Abort the run on a failed session init or any failed row.
    Strict,
    /// Keep going with zero-filled rows and report the gaps.
    #[default]
    Lenient,
}

/// Global configuration loaded from `~/.config/mmv/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MmvConfig {
    /// Base URL of the numbers service.
    pub base_url: String,
    /// Dimension N of the square datasets.
    pub dimension: usize,
    /// Maximum row fetches in flight per dataset (1 = sequential).
    pub concurrency: usize,
    #[serde(default)]
    pub row_failure_policy: RowFailurePolicy,
    /// Threads used for multiplication (None = available parallelism).
    #[serde(default)]
    pub multiply_workers: Option<usize>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for MmvConfig {
    fn default() -> Self {
        Self {
            base_url: "https://recruitment-test.investcloud.com/".to_string(),
            dimension: 1000,
            concurrency: 1,
            row_failure_policy: RowFailurePolicy::Lenient,
            multiply_workers: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            retry: None,
        }
    }
}

impl MmvConfig {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.dimension == 0 {
            return Err(PipelineError::Config("dimension must be positive".into()));
        }
        if self.concurrency == 0 {
            return Err(PipelineError::Config("concurrency must be positive".into()));
        }
        if self.multiply_workers == Some(0) {
            return Err(PipelineError::Config("multiply_workers must be positive".into()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| PipelineError::Config(format!("base_url {:?}: {}", self.base_url, e)))?;
        if let Some(retry) = &self.retry {
            Duration::try_from_secs_f64(retry.base_delay_secs).map_err(|e| {
                PipelineError::Config(format!("retry.base_delay_secs {}: {}", retry.base_delay_secs, e))
            })?;
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mmv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MmvConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<MmvConfig> {
    if !path.exists() {
        let default_cfg = MmvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(path)
}

pub fn load_from_path(path: &Path) -> Result<MmvConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MmvConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
