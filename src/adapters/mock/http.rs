//! Scripted HTTP client for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A request seen by [`MockHttpClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// The body parsed as JSON, `Null` when there is none.
    pub fn json(&self) -> serde_json::Value {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
            .unwrap_or_default()
    }
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Reply(Response),
    Fail(HttpError),
}

impl MockResponse {
    /// Empty-bodied reply.
    pub fn status(status: u16) -> Self {
        MockResponse::Reply(Response::new(status, Bytes::new()))
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        MockResponse::Reply(Response::new(status, Bytes::from(body.to_string())))
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<(String, MockResponse)>,
    once: HashMap<String, VecDeque<MockResponse>>,
    fallback: Option<MockResponse>,
    requests: Vec<RecordedRequest>,
}

impl MockState {
    fn answer(&mut self, url: &str) -> Result<Response, HttpError> {
        let queued = self.once.get_mut(url).and_then(VecDeque::pop_front);
        let routed = || {
            self.routes
                .iter()
                .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, response)| response.clone())
        };
        match queued
            .or_else(routed)
            .or_else(|| self.fallback.clone())
        {
            Some(MockResponse::Reply(response)) => Ok(response),
            Some(MockResponse::Fail(err)) => Err(err),
            None => Err(HttpError::Other(format!("no mock route for {}", url))),
        }
    }
}

/// HTTP client answering from a route table and recording every request.
///
/// For each request the first match wins:
/// 1. a one-shot answer queued for the exact URL with [`route_once`](Self::route_once)
/// 2. the longest [`route`](Self::route) prefix of the URL
/// 3. the [`fallback`](Self::fallback)
///
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every URL starting with `prefix`.
    pub fn route(&self, prefix: &str, response: MockResponse) {
        let mut state = self.state.lock().unwrap();
        state.routes.retain(|(existing, _)| existing != prefix);
        state.routes.push((prefix.to_string(), response));
    }

    /// Answer the next request to exactly `url`, ahead of any route.
    pub fn route_once(&self, url: &str, response: MockResponse) {
        self.state
            .lock()
            .unwrap()
            .once
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn fallback(&self, response: MockResponse) {
        self.state.lock().unwrap().fallback = Some(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    fn handle(
        &self,
        method: &'static str,
        url: &str,
        headers: &Headers,
        body: Option<&str>,
    ) -> Result<Response, HttpError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });
        state.answer(url)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("GET", url, headers, None)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("POST", url, headers, Some(body))
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("DELETE", url, headers, None)
    }
}
