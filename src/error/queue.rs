//! Errors raised by the coalescing queue and its batch handlers.

use thiserror::Error;

use crate::traits::HttpError;

/// Errors from constructing a [`CoalescingQueue`](crate::queue::CoalescingQueue).
///
/// `add` itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `max_count` must be at least 1.
    #[error("max_count must be at least 1")]
    InvalidMaxCount,

    /// The queue spawns its timer and worker on the current tokio runtime.
    #[error("coalescing queue must be created inside a tokio runtime")]
    NoRuntime,
}

/// Failure reported by a batch handler.
///
/// The queue swallows these after re-queuing the batch; they only surface in
/// logs.
#[derive(Debug, Clone, Error)]
pub enum BatchError {
    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The handler refused the batch for another reason.
    #[error("batch rejected: {0}")]
    Rejected(String),
}

impl BatchError {
    /// Check if retrying the same batch later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BatchError::Http(HttpError::InvalidUrl(_)) => false,
            BatchError::Http(_) => true,
            BatchError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            BatchError::InvalidResponse(_) => false,
            BatchError::Rejected(_) => true,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            BatchError::Http(_) => "BATCH_HTTP",
            BatchError::UnexpectedStatus { .. } => "BATCH_STATUS",
            BatchError::InvalidResponse(_) => "BATCH_INVALID_RESPONSE",
            BatchError::Rejected(_) => "BATCH_REJECTED",
        }
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        BatchError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_display() {
        assert_eq!(
            QueueError::InvalidMaxCount.to_string(),
            "max_count must be at least 1"
        );
    }

    #[test]
    fn test_batch_error_retryable() {
        assert!(BatchError::Http(HttpError::Timeout("30s".into())).is_retryable());
        assert!(!BatchError::Http(HttpError::InvalidUrl("nope".into())).is_retryable());
        assert!(BatchError::UnexpectedStatus {
            status: 429,
            body: String::new()
        }
        .is_retryable());
        assert!(BatchError::UnexpectedStatus {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!BatchError::UnexpectedStatus {
            status: 403,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_batch_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BatchError = json_err.into();
        assert!(matches!(err, BatchError::InvalidResponse(_)));
    }

    #[test]
    fn test_batch_error_transparent_http() {
        let err: BatchError = HttpError::Timeout("30s".into()).into();
        assert_eq!(err.to_string(), "request timed out: 30s");
    }
}
