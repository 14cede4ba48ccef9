//! Logging setup. Events are appended to `$XDG_STATE_HOME/mmv/mmv.log`; if
//! that file cannot be opened they go to stderr instead.
//!
//! The filter comes from `MMV_LOG`, then `RUST_LOG`, then [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const FILTER_ENV: &str = "MMV_LOG";
pub const DEFAULT_FILTER: &str = "info,mmv=debug,mmv_core=debug";

/// Where the global subscriber writes.
#[derive(Debug)]
pub enum LogSink {
    File(PathBuf),
    /// The log file could not be used, for the given reason.
    Stderr(anyhow::Error),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/mmv/mmv.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mmv")?;
    Ok(xdg_dirs.get_state_home().join("mmv").join("mmv.log"))
}

/// Opens `path` for appending, creating missing parent directories.
pub(crate) fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

/// Installs the global subscriber. Call once, before any other output.
pub fn init_logging() -> LogSink {
    let opened = log_file_path().and_then(|path| open_log_file(&path).map(|file| (path, file)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);

    match opened {
        Ok((path, file)) => {
            builder.with_writer(Mutex::new(file)).init();
            tracing::info!(path = %path.display(), "mmv logging initialized");
            LogSink::File(path)
        }
        Err(err) => {
            builder.with_writer(std::io::stderr).init();
            LogSink::Stderr(err)
        }
    }
}
