//! Retry loop: run a fetch until success, a non-retryable error, or cancel.

use crate::control::CancelToken;
use crate::error::RowError;

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or `policy` says to stop. A backoff sleep cut
/// short by `cancel` ends the loop with [`RowError::Cancelled`].
pub fn run_with_retry<T, F>(policy: &RetryPolicy, cancel: &CancelToken, mut f: F) -> Result<T, RowError>
where
    F: FnMut() -> Result<T, RowError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify::classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(attempt, error = %e, delay_ms = d.as_millis() as u64, "retrying");
                    if !cancel.sleep(d) {
                        return Err(RowError::Cancelled);
                    }
                    attempt += 1;
                }
            },
        }
    }
}
