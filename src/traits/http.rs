//! The HTTP seam used by batch handlers.
//!
//! Handlers in [`crate::refresh`] make plain JSON request/response calls
//! against the chat REST API. They hold an [`HttpClient`] so tests can swap
//! the transport for [`MockHttpClient`](crate::adapters::mock::MockHttpClient).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Header name to value. Names are matched case-insensitively on lookup.
pub type Headers = HashMap<String, String>;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self::with_headers(status, Headers::new(), body)
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 from the API's rate limiter.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Wait requested by a `Retry-After` header, in (possibly fractional)
    /// seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        let seconds: f64 = self.header("retry-after")?.trim().parse().ok()?;
        Duration::try_from_secs_f64(seconds).ok()
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Headers for a JSON request, authorized when a token is configured.
pub fn json_headers(token: Option<&str>) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    if let Some(token) = token {
        headers.insert("Authorization".to_string(), token.to_string());
    }
    headers
}

/// Transport failures. A response with any status is not an error here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("could not connect: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The connection dropped while the body was being read.
    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Other(String),
}

/// Minimal async HTTP client.
///
/// # Example
///
/// ```ignore
/// use chatmod::traits::{json_headers, HttpClient, HttpError};
///
/// async fn remove<C: HttpClient>(client: &C, url: &str) -> Result<bool, HttpError> {
///     let response = client.delete(url, &json_headers(Some("token"))).await?;
///     Ok(response.is_success() || response.status == 404)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// POST `body` as-is; set `Content-Type` through `headers`.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(status: u16, name: &str, value: &str) -> Response {
        let mut headers = Headers::new();
        headers.insert(name.to_string(), value.to_string());
        Response::with_headers(status, headers, Bytes::new())
    }

    #[test]
    fn test_status_helpers() {
        assert!(Response::new(204, Bytes::new()).is_success());
        assert!(!Response::new(404, Bytes::new()).is_success());

        let limited = Response::new(429, Bytes::new());
        assert!(!limited.is_success());
        assert!(limited.is_rate_limited());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = with_header(200, "X-RateLimit-Bucket", "abc");
        assert_eq!(response.header("x-ratelimit-bucket"), Some("abc"));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(
            with_header(429, "Retry-After", "1.5").retry_after(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            with_header(429, "retry-after", "2").retry_after(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(with_header(429, "Retry-After", "soon").retry_after(), None);
        assert_eq!(with_header(429, "Retry-After", "-1").retry_after(), None);
        assert_eq!(Response::new(429, Bytes::new()).retry_after(), None);
    }

    #[test]
    fn test_body_helpers() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Refreshed {
            original: String,
            refreshed: String,
        }

        let response = Response::new(
            200,
            Bytes::from(r#"{"original":"https://a/1","refreshed":"https://a/1?ex=ff"}"#),
        );
        let data: Refreshed = response.json().unwrap();
        assert_eq!(data.refreshed, "https://a/1?ex=ff");

        let garbled = Response::new(500, Bytes::from_static(b"bad \xff gateway"));
        assert_eq!(garbled.text_lossy(), "bad \u{fffd} gateway");
    }

    #[test]
    fn test_json_headers() {
        let headers = json_headers(Some("secret"));
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Authorization"], "secret");

        assert!(!json_headers(None).contains_key("Authorization"));
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::Connect("refused".to_string()).to_string(),
            "could not connect: refused"
        );
        assert_eq!(
            HttpError::InvalidUrl("bad url".to_string()).to_string(),
            "invalid URL: bad url"
        );
    }
}
