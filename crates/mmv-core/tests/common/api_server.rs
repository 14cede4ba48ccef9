//! Minimal HTTP/1.1 numbers service for integration tests.
//!
//! Serves `init`, per-row and `validate` endpoints for two fixed matrices.
//! One request per connection (`Connection: close`).

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiServerOptions {
    pub init_ok: bool,
    /// (dataset, row) answered with `success: false`.
    pub rejected_rows: HashSet<(String, usize)>,
    /// (dataset, row) answered with HTTP 500.
    pub broken_rows: HashSet<(String, usize)>,
    /// (dataset, row) answered with 503 on the first request only.
    pub flaky_rows: HashSet<(String, usize)>,
    /// Digest the validator accepts.
    pub expected_digest: String,
}

impl Default for ApiServerOptions {
    fn default() -> Self {
        Self {
            init_ok: true,
            rejected_rows: HashSet::new(),
            broken_rows: HashSet::new(),
            flaky_rows: HashSet::new(),
            expected_digest: String::new(),
        }
    }
}

pub struct ApiServer {
    pub base_url: String,
    pub row_requests: Arc<AtomicUsize>,
    pub validated: Arc<Mutex<Vec<String>>>,
}

struct Shared {
    a: Vec<Vec<i32>>,
    b: Vec<Vec<i32>>,
    opts: ApiServerOptions,
    attempts: Mutex<HashMap<(String, usize), usize>>,
    row_requests: Arc<AtomicUsize>,
    validated: Arc<Mutex<Vec<String>>>,
}

/// Starts the server on an ephemeral port. Runs until the process exits.
pub fn start(a: Vec<Vec<i32>>, b: Vec<Vec<i32>>, opts: ApiServerOptions) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let row_requests = Arc::new(AtomicUsize::new(0));
    let validated = Arc::new(Mutex::new(Vec::new()));
    let shared = Arc::new(Shared {
        a,
        b,
        opts,
        attempts: Mutex::new(HashMap::new()),
        row_requests: Arc::clone(&row_requests),
        validated: Arc::clone(&validated),
    });
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let shared = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &shared));
        }
    });
    ApiServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        row_requests,
        validated,
    }
}

fn handle(mut stream: TcpStream, shared: &Shared) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some((method, path, body)) = read_request(&mut stream) else {
        return;
    };
    let (status, payload) = route(shared, &method, &path, &body);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
}

fn route(shared: &Shared, method: &str, path: &str, body: &[u8]) -> (&'static str, String) {
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, parts.as_slice()) {
        ("GET", ["api", "numbers", "init", _]) => (
            "200 OK",
            format!(r#"{{"value":null,"cause":null,"success":{}}}"#, shared.opts.init_ok),
        ),
        ("GET", ["api", "numbers", ds, "row", idx]) => {
            shared.row_requests.fetch_add(1, Ordering::SeqCst);
            let key = (ds.to_string(), idx.parse::<usize>().unwrap_or(usize::MAX));
            let attempt = {
                let mut attempts = shared.attempts.lock().unwrap();
                let n = attempts.entry(key.clone()).or_insert(0);
                *n += 1;
                *n
            };
            if shared.opts.broken_rows.contains(&key) {
                return ("500 Internal Server Error", String::new());
            }
            if shared.opts.flaky_rows.contains(&key) && attempt == 1 {
                return ("503 Service Unavailable", String::new());
            }
            if shared.opts.rejected_rows.contains(&key) {
                return ("200 OK", r#"{"value":null,"cause":"row unavailable","success":false}"#.to_string());
            }
            let matrix = match *ds {
                "A" => &shared.a,
                "B" => &shared.b,
                _ => return ("404 Not Found", String::new()),
            };
            match matrix.get(key.1) {
                Some(row) => {
                    let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                    (
                        "200 OK",
                        format!(r#"{{"value":[{}],"cause":null,"success":true}}"#, values.join(",")),
                    )
                }
                None => ("404 Not Found", String::new()),
            }
        }
        ("POST", ["api", "numbers", "validate"]) => {
            let submitted = String::from_utf8_lossy(body).to_string();
            let ok = submitted == shared.opts.expected_digest;
            shared.validated.lock().unwrap().push(submitted);
            let cause = if ok { "null" } else { r#""digest mismatch""# };
            ("200 OK", format!(r#"{{"value":null,"cause":{},"success":{}}}"#, cause, ok))
        }
        _ => ("404 Not Found", String::new()),
    }
}

/// Returns (method, path, body). Reads the body according to Content-Length.
fn read_request(stream: &mut TcpStream) -> Option<(String, String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);
    Some((method, path, body))
}
