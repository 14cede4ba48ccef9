//! Submit the product digest to the validation endpoint.

use crate::api::{Envelope, VALIDATE_PATH};
use crate::transport::Transport;

/// What the validator said. Never an error: transport failures and non-2xx
/// statuses are rejections with a cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub accepted: bool,
    /// HTTP status, if a response was received.
    pub status: Option<u32>,
    pub cause: Option<String>,
}

impl VerificationOutcome {
    fn rejected(status: Option<u32>, cause: impl Into<String>) -> Self {
        Self {
            accepted: false,
            status,
            cause: Some(cause.into()),
        }
    }
}

/// `POST api/numbers/validate` with the raw digest as the body.
///
/// On a 2xx response the body's `success` flag decides when the body is an
/// envelope; a 2xx with any other body counts as accepted.
pub fn verify(transport: &dyn Transport, digest: &str) -> VerificationOutcome {
    let resp = match transport.post_json(VALIDATE_PATH, digest.as_bytes()) {
        Ok(resp) => resp,
        Err(e) => return VerificationOutcome::rejected(None, e.to_string()),
    };
    if !resp.is_success() {
        return VerificationOutcome::rejected(Some(resp.status), format!("HTTP {}", resp.status));
    }
    match serde_json::from_slice::<Envelope<serde_json::Value>>(&resp.body) {
        Ok(env) => VerificationOutcome {
            accepted: env.success,
            status: Some(resp.status),
            cause: env.cause,
        },
        Err(_) => VerificationOutcome {
            accepted: true,
            status: Some(resp.status),
            cause: None,
        },
    }
}
