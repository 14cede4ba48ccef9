//! End-to-end run: init → acquire A and B → multiply → digest → verify.
//!
//! Orchestration is async; every stage that blocks (libcurl requests, the
//! acquisition worker pools, the multiplication) runs on `spawn_blocking`.
//! Datasets A and B are acquired concurrently and joined before
//! multiplication starts.

mod report;
mod state;

pub use report::{format_elapsed, LocalReport, RunReport};
pub use state::PipelineState;

use std::sync::Arc;
use std::time::Instant;

use crate::acquire::{acquire, AcquireOptions, Acquisition};
use crate::api::Dataset;
use crate::config::{MmvConfig, RowFailurePolicy};
use crate::control::CancelToken;
use crate::digest::digest;
use crate::error::{PipelineError, RowError};
use crate::fetch::init_session;
use crate::generate;
use crate::multiply::{default_workers, multiply_with_workers};
use crate::retry::RetryPolicy;
use crate::transport::{CurlTransport, Transport};
use crate::verify::verify;

pub struct Pipeline {
    transport: Arc<dyn Transport>,
    cfg: MmvConfig,
    cancel: CancelToken,
    state: PipelineState,
}

impl Pipeline {
    /// Validates `cfg` and wraps an existing transport.
    pub fn new(transport: Arc<dyn Transport>, cfg: MmvConfig) -> Result<Self, PipelineError> {
        cfg.validate()?;
        Ok(Self {
            transport,
            cfg,
            cancel: CancelToken::new(),
            state: PipelineState::Idle,
        })
    }

    /// Builds a libcurl transport from `cfg.base_url` and its timeouts.
    pub fn from_config(cfg: MmvConfig) -> Result<Self, PipelineError> {
        cfg.validate()?;
        let transport = CurlTransport::new(&cfg.base_url)
            .map_err(|e| PipelineError::Config(format!("base_url: {e}")))?
            .with_timeouts(cfg.connect_timeout(), cfg.request_timeout());
        Self::new(Arc::new(transport), cfg)
    }

    /// Handle for cancelling a run from another task (e.g. on Ctrl-C). A
    /// cancel applies to the run in progress, or to the next one if none is,
    /// and is cleared when that run ends.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &MmvConfig {
        &self.cfg
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }

    /// Runs all stages once. Verification rejection is reported in the
    /// returned report; only fatal conditions produce an error.
    pub async fn run(&mut self) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let result = self.run_stages(started).await;
        self.cancel.reset();
        match result {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!(state = %self.state, error = %e, "pipeline failed");
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self, started: Instant) -> Result<RunReport, PipelineError> {
        let strict = self.cfg.row_failure_policy == RowFailurePolicy::Strict;
        let dimension = self.cfg.dimension;

        self.transition(PipelineState::Initializing);
        let transport = Arc::clone(&self.transport);
        let init = tokio::task::spawn_blocking(move || init_session(transport.as_ref(), dimension)).await?;
        if init.success {
            tracing::info!(dimension, "remote dataset initialized");
        } else {
            let cause = init.cause.clone().unwrap_or_else(|| "no cause given".to_string());
            if strict {
                return Err(PipelineError::Init { cause });
            }
            tracing::warn!(%cause, "remote dataset initialization failed; continuing");
        }
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        self.transition(PipelineState::Acquiring);
        let compute_start = Instant::now();
        // Fail-fast trips only this run's child token.
        let opts = AcquireOptions {
            concurrency: self.cfg.concurrency,
            retry: self.cfg.retry.as_ref().map(RetryPolicy::from),
            fail_fast: strict,
            cancel: self.cancel.child(),
        };
        let (a, b) = tokio::try_join!(
            self.spawn_acquire(Dataset::A, opts.clone()),
            self.spawn_acquire(Dataset::B, opts),
        )?;
        self.check_acquisitions(&a, &b, strict)?;
        let failed_rows_a = a.failed_indices();
        let failed_rows_b = b.failed_indices();

        self.transition(PipelineState::Multiplying);
        let workers = self.cfg.multiply_workers.unwrap_or_else(default_workers);
        let (left, right) = (a.matrix, b.matrix);
        let product =
            tokio::task::spawn_blocking(move || multiply_with_workers(&left, &right, workers)).await??;

        self.transition(PipelineState::Digesting);
        let digest = tokio::task::spawn_blocking(move || digest(&product)).await?;
        let compute_elapsed = compute_start.elapsed();
        tracing::info!(%digest, elapsed_ms = compute_elapsed.as_millis() as u64, "product digested");

        self.transition(PipelineState::Verifying);
        let transport = Arc::clone(&self.transport);
        let submitted = digest.clone();
        let verification = tokio::task::spawn_blocking(move || verify(transport.as_ref(), &submitted)).await?;
        tracing::info!(accepted = verification.accepted, status = ?verification.status, "verification finished");

        self.transition(PipelineState::Done);
        Ok(RunReport {
            dimension,
            init,
            failed_rows_a,
            failed_rows_b,
            digest,
            verification,
            compute_elapsed,
            total_elapsed: started.elapsed(),
            state: self.state,
        })
    }

    fn spawn_acquire(&self, dataset: Dataset, opts: AcquireOptions) -> tokio::task::JoinHandle<Acquisition> {
        let transport = Arc::clone(&self.transport);
        let dimension = self.cfg.dimension;
        tokio::task::spawn_blocking(move || acquire(transport.as_ref(), dataset, dimension, &opts))
    }

    /// Strict runs fail on any real row failure; any run fails if it was
    /// cancelled from outside.
    fn check_acquisitions(&self, a: &Acquisition, b: &Acquisition, strict: bool) -> Result<(), PipelineError> {
        if strict {
            for acq in [a, b] {
                let failed: Vec<usize> = acq
                    .failed
                    .iter()
                    .filter(|f| f.error != RowError::Cancelled)
                    .map(|f| f.index)
                    .collect();
                if !failed.is_empty() {
                    return Err(PipelineError::Acquisition {
                        dataset: acq.dataset,
                        failed,
                    });
                }
            }
        }
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }
}

/// Offline run on generated datasets: multiply and digest, no network.
pub fn run_local(dimension: usize, workers: Option<usize>) -> Result<LocalReport, PipelineError> {
    let started = Instant::now();
    let a = generate::dataset(Dataset::A, dimension);
    let b = generate::dataset(Dataset::B, dimension);
    let product = multiply_with_workers(&a, &b, workers.unwrap_or_else(default_workers))?;
    let digest = digest(&product);
    Ok(LocalReport {
        dimension,
        digest,
        elapsed: started.elapsed(),
    })
}
