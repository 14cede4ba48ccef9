//! `mmv config` – show where the config lives and what is in effect.

use anyhow::{Context, Result};
use mmv_core::config::{self, MmvConfig};

pub fn show_config(cfg: &MmvConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("# {}", path.display());
    print!("{}", render(cfg)?);
    Ok(())
}

pub(crate) fn render(cfg: &MmvConfig) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}
