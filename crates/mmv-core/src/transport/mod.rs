//! HTTP transport seam.
//!
//! Row fetches and verification talk to the remote service through the
//! [`Transport`] trait so the pipeline can be driven by libcurl in production
//! and by an in-memory double in tests. Implementations are shared read-only
//! across worker threads (`Send + Sync`); every call is independent.

mod libcurl;

pub use libcurl::{classify_curl_error, CurlTransport};

use thiserror::Error;

/// Raw HTTP response: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure category, used for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportErrorKind {
    #[error("timeout")]
    Timeout,
    #[error("connection failed")]
    Connection,
    #[error("transport error")]
    Other,
}

/// The request never produced an HTTP status (DNS, connect, timeout, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Blocking HTTP transport against the remote API. `path` is relative to the
/// implementation's base URL (e.g. `"api/numbers/A/row/3"`).
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> Result<HttpResponse, TransportError>;

    /// POST `body` with `Content-Type: application/json`.
    fn post_json(&self, path: &str, body: &[u8]) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn transport_error_display_includes_kind() {
        let e = TransportError::new(TransportErrorKind::Timeout, "after 30s");
        assert_eq!(e.to_string(), "timeout: after 30s");
    }
}
