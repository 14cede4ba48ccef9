//! `mmv run` – fetch, multiply and verify against the numbers service.

use anyhow::Result;
use mmv_core::config::MmvConfig;
use mmv_core::pipeline::{format_elapsed, Pipeline, RunReport};

pub async fn run_remote(cfg: MmvConfig) -> Result<bool> {
    let mut pipeline = Pipeline::from_config(cfg)?;
    tracing::info!(
        base_url = %pipeline.config().base_url,
        dimension = pipeline.config().dimension,
        concurrency = pipeline.config().concurrency,
        "starting run"
    );

    let cancel = pipeline.cancel_token();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupted, cancelling...");
            tracing::warn!("interrupt received; cancelling run");
            cancel.cancel();
        }
    });

    let result = pipeline.run().await;
    signal.abort();
    let report = result?;

    for line in report_lines(&report) {
        println!("{line}");
    }
    Ok(report.passed())
}

/// Human-readable summary, one entry per stage.
pub fn report_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.init.success {
        lines.push("Remote Dataset initialization...success!".to_string());
    } else {
        lines.push(format!(
            "Remote Dataset initialization...failed ({})",
            report.init.cause.as_deref().unwrap_or("no cause given")
        ));
    }

    if report.failed_row_count() == 0 {
        lines.push("Remote Dataset A/B fetch...success!".to_string());
    } else {
        lines.push("Remote Dataset A/B fetch...incomplete".to_string());
        for (name, rows) in [("A", &report.failed_rows_a), ("B", &report.failed_rows_b)] {
            if !rows.is_empty() {
                lines.push(format!("  dataset {name}: {} row(s) zero-filled: {rows:?}", rows.len()));
            }
        }
    }

    lines.push(format!("Verifying Hashed string: {}", report.digest));
    let verdict = if report.verification.accepted { "Success!" } else { "Fail" };
    match report.verification.cause.as_deref() {
        Some(cause) if !report.verification.accepted => {
            lines.push(format!("Verification...{verdict} ({cause})"))
        }
        _ => lines.push(format!("Verification...{verdict}")),
    }
    lines.push(format!("Completed in {}", format_elapsed(report.compute_elapsed)));
    lines
}
