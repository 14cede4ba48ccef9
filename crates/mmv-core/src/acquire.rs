//! Dataset acquisition: fetch every row of a dataset with a bounded worker pool.
//!
//! The matrix is split into its rows up front and each `(index, &mut row)`
//! pair is queued exactly once, so a worker can only ever write the row it
//! popped. The matrix itself is never locked; the only shared mutable state is
//! the failure list.
//!
//! Failed rows are left zero-filled and recorded; they do not stop sibling
//! fetches unless `fail_fast` is set, in which case the shared cancel token
//! is tripped and the remaining rows are skipped. Acquisition returns only
//! after every queued row has been handled.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::api::Dataset;
use crate::control::CancelToken;
use crate::error::RowError;
use crate::fetch::{fetch_row, RowResult};
use crate::matrix::Matrix;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Maximum fetches in flight for this dataset (1 = sequential).
    pub concurrency: usize,
    /// `None` = one attempt per row.
    pub retry: Option<RetryPolicy>,
    /// Trip `cancel` on the first failed row.
    pub fail_fast: bool,
    pub cancel: CancelToken,
}

impl AcquireOptions {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            retry: None,
            fail_fast: false,
            cancel: CancelToken::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub index: usize,
    pub error: RowError,
}

/// A populated matrix plus the rows that could not be fetched (sorted by
/// index). Failed rows are all zero.
#[derive(Debug)]
pub struct Acquisition {
    pub dataset: Dataset,
    pub matrix: Matrix,
    pub failed: Vec<RowFailure>,
}

impl Acquisition {
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failed.iter().map(|f| f.index).collect()
    }
}

type RowQueue<'m> = Mutex<VecDeque<(usize, &'m mut [i32])>>;

/// Fetches all `dimension` rows of `dataset` with at most
/// `opts.concurrency` requests in flight.
pub fn acquire(
    transport: &dyn Transport,
    dataset: Dataset,
    dimension: usize,
    opts: &AcquireOptions,
) -> Acquisition {
    let mut matrix = Matrix::zeros(dimension);
    let failures: Mutex<Vec<RowFailure>> = Mutex::new(Vec::new());
    let num_workers = opts.concurrency.max(1).min(dimension);
    tracing::debug!(%dataset, dimension, workers = num_workers, "acquiring dataset");

    {
        let queue: RowQueue<'_> = Mutex::new(matrix.rows_mut().enumerate().collect());
        std::thread::scope(|s| {
            for _ in 0..num_workers {
                s.spawn(|| worker(transport, dataset, dimension, opts, &queue, &failures));
            }
        });
    }

    let mut failed = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
    failed.sort_by_key(|f| f.index);
    if failed.is_empty() {
        tracing::info!(%dataset, rows = dimension, "dataset acquired");
    } else {
        tracing::warn!(%dataset, rows = dimension, failed = failed.len(), "dataset acquired with failed rows");
    }
    Acquisition {
        dataset,
        matrix,
        failed,
    }
}

fn worker(
    transport: &dyn Transport,
    dataset: Dataset,
    dimension: usize,
    opts: &AcquireOptions,
    queue: &RowQueue<'_>,
    failures: &Mutex<Vec<RowFailure>>,
) {
    loop {
        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        let Some((index, row)) = next else {
            break;
        };

        let res = if opts.cancel.is_cancelled() {
            Err(RowError::Cancelled)
        } else {
            fetch_one(transport, dataset, index, dimension, opts)
        };

        match res {
            // fetch_row already checked the length, so the row is replaced whole.
            Ok(values) => row.copy_from_slice(&values),
            Err(error) => {
                if !matches!(error, RowError::Cancelled) {
                    tracing::warn!(%dataset, index, %error, "row fetch failed");
                    if opts.fail_fast {
                        opts.cancel.cancel();
                    }
                }
                failures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(RowFailure { index, error });
            }
        }
    }
}

fn fetch_one(
    transport: &dyn Transport,
    dataset: Dataset,
    index: usize,
    dimension: usize,
    opts: &AcquireOptions,
) -> RowResult {
    match &opts.retry {
        Some(policy) => run_with_retry(policy, &opts.cancel, || {
            fetch_row(transport, dataset, index, dimension)
        }),
        None => fetch_row(transport, dataset, index, dimension),
    }
}
