//! Single-request operations against the numbers service: session init and
//! one row of a dataset.
//!
//! Both convert every failure into their result type; nothing here returns a
//! transport error or panics past the function boundary.

use crate::api::{self, Dataset, Envelope, InitResult};
use crate::error::RowError;
use crate::transport::Transport;

/// Outcome of one row fetch: exactly `dimension` values, or why not.
pub type RowResult = Result<Vec<i32>, RowError>;

/// `GET api/numbers/init/{dimension}`. Must run once before acquisition.
pub fn init_session(transport: &dyn Transport, dimension: usize) -> InitResult {
    let resp = match transport.get(&api::init_path(dimension)) {
        Ok(resp) => resp,
        Err(e) => return InitResult::failed(e.to_string()),
    };
    let envelope = serde_json::from_slice::<Envelope<serde_json::Value>>(&resp.body);
    if !resp.is_success() {
        let cause = envelope
            .ok()
            .and_then(|env| env.cause)
            .map(|c| format!("HTTP {}: {}", resp.status, c))
            .unwrap_or_else(|| format!("HTTP {}", resp.status));
        return InitResult::failed(cause);
    }
    match envelope {
        Ok(env) => InitResult {
            success: env.success,
            value: env.value.and_then(api::value_to_string),
            cause: env.cause,
        },
        Err(e) => InitResult::failed(format!("malformed init response: {e}")),
    }
}

/// `GET api/numbers/{dataset}/row/{index}`, decoded and length-checked.
pub fn fetch_row(transport: &dyn Transport, dataset: Dataset, index: usize, dimension: usize) -> RowResult {
    let resp = transport.get(&api::row_path(dataset, index))?;
    if !resp.is_success() {
        return Err(RowError::Protocol(resp.status));
    }
    decode_row(&resp.body, dimension)
}

fn decode_row(body: &[u8], dimension: usize) -> RowResult {
    let env: Envelope<Vec<i32>> =
        serde_json::from_slice(body).map_err(|e| RowError::Decode(e.to_string()))?;
    if !env.success {
        return Err(RowError::Rejected(env.cause));
    }
    let values = env
        .value
        .ok_or_else(|| RowError::Decode("missing value".to_string()))?;
    if values.len() != dimension {
        return Err(RowError::Decode(format!(
            "expected {} values, got {}",
            dimension,
            values.len()
        )));
    }
    Ok(values)
}
