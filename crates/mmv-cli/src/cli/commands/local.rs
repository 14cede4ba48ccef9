//! `mmv local` – offline multiply of generated datasets.

use anyhow::Result;
use mmv_core::pipeline::{self, format_elapsed};

pub async fn run_local(dimension: usize, workers: Option<usize>) -> Result<()> {
    let report = tokio::task::spawn_blocking(move || pipeline::run_local(dimension, workers)).await??;
    println!("Local Matrix Generation...success!");
    println!("Hashed string: {}", report.digest);
    println!("Completed in {}", format_elapsed(report.elapsed));
    tracing::info!(dimension, digest = %report.digest, "local run finished");
    Ok(())
}
