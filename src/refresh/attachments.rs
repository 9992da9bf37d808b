//! Signed attachment URL refresh.
//!
//! CDN attachment links carry an `ex` query parameter: the expiry time as
//! hex Unix seconds. Expired links are collected and renewed through the
//! `attachments/refresh-urls` endpoint, up to 50 per call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, ChatmodResult, ErrorContext, ResultExt};
use crate::queue::{BatchHandler, CoalescingQueue};
use crate::traits::{Headers, HttpClient};

use super::{status_error, RefreshConfig};

type RefreshCache = Arc<Mutex<HashMap<String, String>>>;

fn lock(cache: &RefreshCache) -> MutexGuard<'_, HashMap<String, String>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Expiry of a signed URL in Unix seconds, if it has one.
pub fn expires_at(url: &str) -> Option<u64> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let (_, ex) = parsed.query_pairs().find(|(key, _)| key == "ex")?;
    u64::from_str_radix(&ex, 16).ok()
}

/// Check whether a signed URL has expired at `now_unix`.
///
/// URLs without a readable `ex` parameter are not signed and never expire.
pub fn is_expired(url: &str, now_unix: u64) -> bool {
    expires_at(url).is_some_and(|expiry| expiry <= now_unix)
}

fn now_unix() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    attachment_urls: &'a [String],
}

#[derive(Deserialize)]
struct RefreshResponse {
    refreshed_urls: Vec<RefreshedUrl>,
}

#[derive(Deserialize)]
struct RefreshedUrl {
    original: String,
    refreshed: String,
}

struct RefreshHandler<C> {
    client: Arc<C>,
    url: String,
    headers: Headers,
    cache: RefreshCache,
}

#[async_trait]
impl<C: HttpClient + 'static> BatchHandler<String> for RefreshHandler<C> {
    async fn handle(&self, batch: &[String]) -> Result<(), BatchError> {
        let body = serde_json::to_string(&RefreshRequest {
            attachment_urls: batch,
        })?;
        let response = self.client.post(&self.url, &body, &self.headers).await?;

        if !response.is_success() {
            return Err(status_error(&response));
        }

        let parsed: RefreshResponse = response.json()?;
        let count = parsed.refreshed_urls.len();
        let mut cache = lock(&self.cache);
        for pair in parsed.refreshed_urls {
            cache.insert(pair.original, pair.refreshed);
        }
        tracing::debug!(requested = batch.len(), refreshed = count, "Attachment URLs refreshed");
        Ok(())
    }
}

/// Collects expired attachment URLs and renews them in batches.
///
/// # Example
///
/// ```ignore
/// let refresher = AttachmentUrlRefresher::new(Arc::new(ReqwestHttpClient::new()), &config)?;
/// refresher.request(&url);
/// // later
/// let fresh = refresher.refreshed(&url).unwrap_or(url);
/// ```
pub struct AttachmentUrlRefresher {
    queue: CoalescingQueue<String>,
    cache: RefreshCache,
}

impl AttachmentUrlRefresher {
    pub fn new<C: HttpClient + 'static>(
        client: Arc<C>,
        config: &RefreshConfig,
    ) -> ChatmodResult<Self> {
        let cache = RefreshCache::default();
        let handler = RefreshHandler {
            client,
            url: format!("{}/attachments/refresh-urls", config.base()),
            headers: config.headers(),
            cache: Arc::clone(&cache),
        };
        let queue = CoalescingQueue::new(handler, config.attachments)
            .context(ErrorContext::new("attachment_refresher").with_component("refresh"))?;
        Ok(Self { queue, cache })
    }

    /// Queue `url` for refresh if it is expired now.
    pub fn request(&self, url: &str) -> bool {
        self.request_at(url, now_unix())
    }

    /// Queue `url` for refresh if it is expired at `now_unix` and no
    /// still-valid replacement is cached. Returns whether it was queued.
    ///
    /// Cached replacements that have expired themselves are dropped.
    pub fn request_at(&self, url: &str, now_unix: u64) -> bool {
        if !is_expired(url, now_unix) {
            return false;
        }
        {
            let mut cache = lock(&self.cache);
            let before = cache.len();
            cache.retain(|_, fresh| !is_expired(fresh, now_unix));
            if cache.len() < before {
                tracing::trace!(pruned = before - cache.len(), "Dropped expired refreshed URLs");
            }
            if cache.contains_key(url) {
                return false;
            }
        }
        self.queue.add(url.to_string());
        true
    }

    /// Number of cached refreshed URLs.
    pub fn cached(&self) -> usize {
        lock(&self.cache).len()
    }

    /// The refreshed form of `url`, once a batch containing it succeeded.
    pub fn refreshed(&self, url: &str) -> Option<String> {
        lock(&self.cache).get(url).cloned()
    }
}
