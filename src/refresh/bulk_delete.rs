//! Rate-limited message deletion.
//!
//! Deletes are queued and grouped per channel. Two or more ids in a
//! channel go out as one bulk-delete call; the bulk route rejects a single
//! id, so a lone message uses the plain delete route.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, ChatmodResult, ErrorContext, ResultExt};
use crate::queue::{BatchHandler, CoalescingQueue};
use crate::traits::{Headers, HttpClient, Response};

use super::{status_error, RefreshConfig};

/// Most ids the bulk-delete route accepts per call.
pub const BULK_DELETE_LIMIT: usize = 100;

/// A message to delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: String,
    pub message_id: String,
}

impl MessageRef {
    pub fn new(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

#[derive(Serialize)]
struct BulkDeleteRequest<'a> {
    messages: &'a [&'a str],
}

/// Group a batch by channel, keeping first-seen channel order.
fn group_by_channel(batch: &[MessageRef]) -> Vec<(&str, Vec<&str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for message in batch {
        match groups
            .iter_mut()
            .find(|(channel, _)| *channel == message.channel_id)
        {
            Some((_, ids)) => ids.push(&message.message_id),
            None => groups.push((&message.channel_id, vec![&message.message_id])),
        }
    }
    groups
}

struct BulkDeleteHandler<C> {
    client: Arc<C>,
    api_base: String,
    headers: Headers,
}

impl<C: HttpClient> BulkDeleteHandler<C> {
    async fn delete_chunk(&self, channel_id: &str, ids: &[&str]) -> Result<(), BatchError> {
        let response = match ids {
            [id] => {
                let url = format!("{}/channels/{}/messages/{}", self.api_base, channel_id, id);
                self.client.delete(&url, &self.headers).await?
            }
            _ => {
                let url = format!(
                    "{}/channels/{}/messages/bulk-delete",
                    self.api_base, channel_id
                );
                let body = serde_json::to_string(&BulkDeleteRequest { messages: ids })?;
                self.client.post(&url, &body, &self.headers).await?
            }
        };
        check(response)
    }
}

/// 404 means the message is already gone, which is what we wanted.
fn check(response: Response) -> Result<(), BatchError> {
    if response.is_success() || response.status == 404 {
        return Ok(());
    }
    Err(status_error(&response))
}

impl<C: HttpClient> BulkDeleteHandler<C> {
    async fn delete_in_channel(&self, channel_id: &str, ids: &[&str]) -> Result<(), BatchError> {
        for chunk in ids.chunks(BULK_DELETE_LIMIT) {
            self.delete_chunk(channel_id, chunk).await?;
            tracing::debug!(channel_id, count = chunk.len(), "Deleted messages");
        }
        Ok(())
    }
}

#[async_trait]
impl<C: HttpClient + 'static> BatchHandler<MessageRef> for BulkDeleteHandler<C> {
    /// Channels are rate limited separately, so they run concurrently. Every
    /// channel finishes before the first error is reported.
    async fn handle(&self, batch: &[MessageRef]) -> Result<(), BatchError> {
        let groups = group_by_channel(batch);
        let results = join_all(
            groups
                .iter()
                .map(|(channel_id, ids)| self.delete_in_channel(channel_id, ids)),
        )
        .await;
        results.into_iter().collect()
    }
}

/// Queues message deletions and sends them in bulk.
pub struct BulkDeleter {
    queue: CoalescingQueue<MessageRef>,
}

impl BulkDeleter {
    pub fn new<C: HttpClient + 'static>(
        client: Arc<C>,
        config: &RefreshConfig,
    ) -> ChatmodResult<Self> {
        let handler = BulkDeleteHandler {
            client,
            api_base: config.base().to_string(),
            headers: config.headers(),
        };
        let queue = CoalescingQueue::new(handler, config.bulk_delete)
            .context(ErrorContext::new("bulk_deleter").with_component("refresh"))?;
        Ok(Self { queue })
    }

    pub fn delete(&self, channel_id: impl Into<String>, message_id: impl Into<String>) {
        self.queue.add(MessageRef::new(channel_id, message_id));
    }
}
