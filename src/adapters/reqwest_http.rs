//! [`HttpClient`] over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("chatmod/", env!("CARGO_PKG_VERSION"));

/// Production HTTP client.
///
/// Every response is read to the end before it is returned; statuses are
/// left for the caller to judge.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self::from_client(client)
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map(Self::from_client)
            .map_err(classify)
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let mut request = self.client.request(method.clone(), url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_owned());
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let response_headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| HttpError::Body(err.to_string()))?;

        tracing::trace!(%method, url, status, bytes = body.len(), "HTTP response");
        Ok(Response::with_headers(status, response_headers, body))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(err.to_string())
    } else if err.is_connect() {
        HttpError::Connect(err.to_string())
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else {
        HttpError::Other(err.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(Method::GET, url, None, headers).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(Method::POST, url, Some(body), headers).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(Method::DELETE, url, None, headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::json_headers;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_forwards_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("Authorization", "tok"))
            .and(header("Content-Type", "application/json"))
            .and(header("User-Agent", USER_AGENT))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let response = client
            .post(
                &format!("{}/echo", server.uri()),
                r#"{"a":1}"#,
                &json_headers(Some("tok")),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text_lossy(), "ok");
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/channels/1/messages/2"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0.5"))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        let response = client
            .delete(
                &format!("{}/channels/1/messages/2", server.uri()),
                &Headers::new(),
            )
            .await
            .unwrap();

        assert!(response.is_rate_limited());
        assert_eq!(response.retry_after(), Some(Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client.get("not a url", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .get("http://127.0.0.1:9/unreachable", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::Connect(_)) | Err(HttpError::Other(_))
        ));
    }
}
