//! Error taxonomy shared across the pipeline.

use thiserror::Error;

use crate::api::Dataset;
use crate::transport::TransportError;

/// Why a single row fetch failed. Captured per row; never aborts siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// No HTTP status was obtained (connect, DNS, timeout).
    #[error("{0}")]
    Transport(#[from] TransportError),
    /// The service answered with a non-2xx status.
    #[error("HTTP {0}")]
    Protocol(u32),
    /// Body was not a row envelope, or the row had the wrong length.
    #[error("malformed row: {0}")]
    Decode(String),
    /// The envelope said `success: false`.
    #[error("service reported failure: {}", .0.as_deref().unwrap_or("no cause given"))]
    Rejected(Option<String>),
    /// The fetch was skipped because the run was cancelled.
    #[error("cancelled before fetch")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiplyError {
    #[error("shape mismatch: left is {left}x{left}, right is {right}x{right}")]
    ShapeMismatch { left: usize, right: usize },
}

/// Fatal pipeline errors. Verification rejection is not one of them: it is
/// reported in the run report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("session initialization failed: {cause}")]
    Init { cause: String },

    #[error("dataset {dataset}: {} row(s) failed to fetch: {failed:?}", .failed.len())]
    Acquisition { dataset: Dataset, failed: Vec<usize> },

    #[error(transparent)]
    Multiply(#[from] MultiplyError),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("run cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),
}
