//! libcurl-backed [`Transport`]: one `Easy` handle per request.

use std::time::Duration;

use curl::easy::{Easy, List};
use url::Url;

use super::{HttpResponse, Transport, TransportError, TransportErrorKind};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking HTTP client for the remote API.
///
/// Holds only the base URL and timeouts; a fresh `Easy` handle is created per
/// request so the transport can be shared across worker threads without
/// locking.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    base: Url,
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    /// Parses `base_url`, appending a trailing `/` so relative API paths
    /// extend it rather than replace its last segment.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::new(TransportErrorKind::Other, format!("bad path {path}: {e}")))
    }

    fn perform(&self, path: &str, post_body: Option<&[u8]>) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(path)?;
        let mut body = Vec::new();

        let mut easy = Easy::new();
        easy.url(url.as_str()).map_err(curl_error)?;
        easy.follow_location(true).map_err(curl_error)?;
        easy.connect_timeout(self.connect_timeout).map_err(curl_error)?;
        easy.timeout(self.timeout).map_err(curl_error)?;

        if let Some(payload) = post_body {
            easy.post(true).map_err(curl_error)?;
            easy.post_fields_copy(payload).map_err(curl_error)?;
            let mut list = List::new();
            list.append("Content-Type: application/json; charset=utf-8")
                .map_err(curl_error)?;
            easy.http_headers(list).map_err(curl_error)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_error)?;
            transfer.perform().map_err(curl_error)?;
        }

        let status = easy.response_code().map_err(curl_error)?;
        tracing::trace!(%url, status, bytes = body.len(), "http response");
        Ok(HttpResponse { status, body })
    }
}

impl Transport for CurlTransport {
    fn get(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.perform(path, None)
    }

    fn post_json(&self, path: &str, body: &[u8]) -> Result<HttpResponse, TransportError> {
        self.perform(path, Some(body))
    }
}

fn curl_error(e: curl::Error) -> TransportError {
    TransportError::new(classify_curl_error(&e), e.to_string())
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportErrorKind::Connection;
    }
    TransportErrorKind::Other
}
