//! Minimal HTTP client for fetching binary assets, with safe logging and retries.
//!
//! - Request options: timeout, retries, expected content type
//! - Redacts sensitive query params in logs
//! - Retries 429/5xx with exponential backoff and `Retry-After` support
//! - Optional *raw* request logging via `VALUESCOUT_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), valuescout_http::HttpError> {
//! let client = valuescout_http::HttpClient::new("https://careers.example.com")?;
//! let asset = client
//!     .get_bytes("/media/logo.png", valuescout_http::RequestOpts::default())
//!     .await?;
//! assert!(!asset.bytes.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, retries and final errors (targets `http.*`).

use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

const RAW_ENV: &str = "VALUESCOUT_HTTP_RAW";

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("unexpected content type '{found}', wanted '{wanted}*'")]
    ContentType { found: String, wanted: String },
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use valuescout_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(10)),
///     retries: Some(0),
///     content_type_prefix: Some("image/"),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 10);
/// assert_eq!(opts.content_type_prefix, Some("image/"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    /// Reject successful responses whose `Content-Type` does not start with
    /// this prefix (a missing header is accepted).
    pub content_type_prefix: Option<&'a str>,
}

/// A successfully downloaded body.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL. Relative paths passed to
    /// [`HttpClient::get_bytes`] resolve against it; absolute and
    /// protocol-relative URLs resolve on their own.
    ///
    /// ```no_run
    /// use valuescout_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://careers.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(10),
            max_retries: 0,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET `path` and return the raw body.
    pub async fn get_bytes(&self, path: &str, opts: RequestOpts<'_>) -> Result<Fetched, HttpError> {
        let url = self.resolve(path)?;
        self.request_bytes_internal(Method::GET, url, opts).await
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_bytes_internal(
        &self,
        method: Method,
        url: Url,
        opts: RequestOpts<'_>,
    ) -> Result<Fetched, HttpError> {
        let mut attempt = 0usize;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        loop {
            let rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);

            let (host_path, redacted_q) = redact_query(&url);
            let attempt0 = attempt + 1;

            tracing::debug!(
                attempt = attempt0,
                max_retries,
                method = %method,
                host_path = %host_path,
                query = ?redacted_q,
                timeout_ms = timeout.as_millis() as u64,
                "http.request.start"
            );

            if raw_enabled() {
                tracing::debug!(target: "http.raw", request = %format!("{method} {url}"), "request");
            }

            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network_send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(attempt, max_retries, message = %message, "http.network_error.send");
                    return Err(HttpError::Network(message));
                }
            };
            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network_body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(attempt, max_retries, message = %message, "http.network_error.body");
                    return Err(HttpError::Network(message));
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            tracing::debug!(
                %status,
                duration_ms = dur_ms,
                body_len = bytes.len(),
                content_type = ?content_type,
                "http.response.headers"
            );

            // ----- Success path -----
            if status.is_success() {
                if let (Some(wanted), Some(found)) = (opts.content_type_prefix, &content_type) {
                    if !found.starts_with(wanted) {
                        tracing::warn!(%found, %wanted, host_path = %host_path, "http.response.content_type");
                        return Err(HttpError::ContentType {
                            found: found.clone(),
                            wanted: wanted.to_string(),
                        });
                    }
                }
                return Ok(Fetched {
                    url,
                    status,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }

            // ----- Non-success: maybe retry -----
            let message = snip_body(&bytes);
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            let is_5xx = status.is_server_error();

            if (is_429 || is_5xx) && attempt < max_retries {
                attempt += 1;
                let delay = if let Some(secs) = retry_after_delay_secs(&headers) {
                    Duration::from_secs(secs)
                } else if is_429 {
                    backoff(attempt).max(Duration::from_millis(1100))
                } else {
                    backoff(attempt)
                };
                tracing::warn!(
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    body_snippet = %message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(%status, host_path = %host_path, body_snippet = %message, "http.error");
            return Err(HttpError::Api { status, message });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(10) as u32;
    Duration::from_millis(200u64.saturating_mul(1 << shift))
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

/// "host + path" plus the query with secret-looking values redacted.
fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = v.to_string();
            let is_secret = matches!(
                k.to_ascii_lowercase().as_str(),
                "access_token"
                    | "authorization"
                    | "auth"
                    | "key"
                    | "api_key"
                    | "token"
                    | "secret"
                    | "signature"
                    | "sig"
            );
            (k, if is_secret { "<redacted>".into() } else { v })
        })
        .collect::<Vec<_>>();
    (host_path, redacted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_protocol_relative_paths() {
        let client = HttpClient::new("https://careers.example.com").unwrap();
        assert_eq!(
            client.resolve("/media/a.png").unwrap().as_str(),
            "https://careers.example.com/media/a.png"
        );
        assert_eq!(
            client.resolve("//static.cdn.net/b.png").unwrap().as_str(),
            "https://static.cdn.net/b.png"
        );
        assert_eq!(
            client.resolve("http://other.org/c.png").unwrap().as_str(),
            "http://other.org/c.png"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(matches!(HttpClient::new("not a url"), Err(HttpError::Url(_))));
    }

    #[test]
    fn redacts_secret_query_values() {
        let url = Url::parse("https://cdn.example.com/i.png?w=200&token=abc&sig=xyz").unwrap();
        let (host_path, q) = redact_query(&url);
        assert_eq!(host_path, "cdn.example.com/i.png");
        assert_eq!(
            q,
            vec![
                ("w".to_string(), "200".to_string()),
                ("token".to_string(), "<redacted>".to_string()),
                ("sig".to_string(), "<redacted>".to_string()),
            ]
        );
    }

    #[test]
    fn backoff_doubles_from_200ms() {
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
        assert_eq!(backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn snip_body_respects_char_boundaries() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= 503);
    }
}
