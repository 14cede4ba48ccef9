//! Map row errors onto retry error kinds.

use crate::error::RowError;
use crate::transport::TransportErrorKind;

use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

pub fn classify(e: &RowError) -> ErrorKind {
    match e {
        RowError::Transport(t) => match t.kind {
            TransportErrorKind::Timeout => ErrorKind::Timeout,
            TransportErrorKind::Connection => ErrorKind::Connection,
            TransportErrorKind::Other => ErrorKind::Other,
        },
        RowError::Protocol(code) => classify_http_status(*code),
        RowError::Decode(_) | RowError::Rejected(_) | RowError::Cancelled => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(502), ErrorKind::Http5xx(502)));
    }

    #[test]
    fn http_4xx_other() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(400), ErrorKind::Other);
    }

    #[test]
    fn row_errors_map_to_kinds() {
        let timeout = RowError::Transport(TransportError::new(TransportErrorKind::Timeout, "t"));
        let refused = RowError::Transport(TransportError::new(TransportErrorKind::Connection, "c"));
        assert_eq!(classify(&timeout), ErrorKind::Timeout);
        assert_eq!(classify(&refused), ErrorKind::Connection);
        assert_eq!(classify(&RowError::Protocol(502)), ErrorKind::Http5xx(502));
        assert_eq!(classify(&RowError::Decode("short".into())), ErrorKind::Other);
        assert_eq!(classify(&RowError::Rejected(None)), ErrorKind::Other);
        assert_eq!(classify(&RowError::Cancelled), ErrorKind::Other);
    }
}
