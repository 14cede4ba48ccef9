//! Optional retry with backoff for row fetches.
//!
//! Retries are off unless configured. When enabled, transport timeouts and
//! connection failures, throttling (429/503) and other 5xx responses are
//! retried with capped exponential backoff; decode errors and rows the service
//! explicitly rejected are not.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
