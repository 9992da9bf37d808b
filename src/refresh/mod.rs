//! Batch consumers built on [`CoalescingQueue`](crate::queue::CoalescingQueue).
//!
//! - [`AttachmentUrlRefresher`] renews expired signed CDN links in bulk.
//! - [`BulkDeleter`] folds individual deletes into bulk-delete calls.

pub mod attachments;
pub mod bulk_delete;

use serde::{Deserialize, Serialize};

use crate::error::{BatchError, ConfigError};
use crate::queue::QueueOptions;
use crate::traits::{json_headers, Headers, Response};

pub use attachments::{is_expired, AttachmentUrlRefresher};
pub use bulk_delete::{BulkDeleter, MessageRef};

/// Default REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v9";

/// API endpoint and batching settings for the batch consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// REST API base URL, without a trailing slash
    pub api_base: String,
    /// Value of the `Authorization` header
    pub token: Option<String>,
    /// Batching for attachment URL refresh (default: 50 per call)
    pub attachments: QueueOptions,
    /// Batching for message deletion (default: 100 per call)
    pub bulk_delete: QueueOptions,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            attachments: QueueOptions::new(50),
            bulk_delete: QueueOptions::new(100),
        }
    }
}

impl RefreshConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_attachments(mut self, options: QueueOptions) -> Self {
        self.attachments = options;
        self
    }

    pub fn with_bulk_delete(mut self, options: QueueOptions) -> Self {
        self.bulk_delete = options;
        self
    }

    /// `api_base` with any trailing slash removed.
    pub fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub(crate) fn headers(&self) -> Headers {
        json_headers(self.token.as_deref())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(err) = reqwest::Url::parse(&self.api_base) {
            return Err(ConfigError::Invalid {
                field: "refresh.api_base",
                reason: err.to_string(),
            });
        }
        if self.attachments.validate().is_err() {
            return Err(ConfigError::Invalid {
                field: "refresh.attachments.max_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bulk_delete.validate().is_err() {
            return Err(ConfigError::Invalid {
                field: "refresh.bulk_delete.max_count",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Turn a non-success response into a batch error, noting any rate-limit
/// wait the API asked for.
pub(crate) fn status_error(response: &Response) -> BatchError {
    if response.is_rate_limited() {
        tracing::warn!(
            retry_after_ms = response.retry_after().map(|wait| wait.as_millis() as u64),
            "Rate limited"
        );
    }
    BatchError::UnexpectedStatus {
        status: response.status,
        body: response.text_lossy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RefreshConfig::default();
        assert_eq!(config.attachments.max_count, 50);
        assert_eq!(config.bulk_delete.max_count, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_trims_slash() {
        let config = RefreshConfig::default().with_api_base("http://localhost:9000/api/");
        assert_eq!(config.base(), "http://localhost:9000/api");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = RefreshConfig::default().with_api_base("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "refresh.api_base",
                ..
            })
        ));

        let config = RefreshConfig::default().with_bulk_delete(QueueOptions::new(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "refresh.bulk_delete.max_count",
                ..
            })
        ));
    }

    #[test]
    fn test_headers_include_token() {
        let config = RefreshConfig::default().with_token("Bot abc");
        assert_eq!(
            config.headers().get("Authorization"),
            Some(&"Bot abc".to_string())
        );
    }
}
