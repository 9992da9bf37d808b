//! Unified error type for chatmod.
//!
//! `ChatmodError` folds the domain errors into one enum so callers get a
//! single category, retry policy and user message regardless of origin.

use std::fmt;

use super::action::ActionError;
use super::category::ErrorCategory;
use super::config::ConfigError;
use super::context::ErrorContext;
use super::queue::{BatchError, QueueError};
use crate::traits::HttpError;

/// Unified error type for chatmod.
#[derive(Debug)]
pub enum ChatmodError {
    /// A click action's preconditions did not hold.
    Action(ActionError),

    /// The coalescing queue could not be constructed.
    Queue(QueueError),

    /// A batch handler failed.
    Batch(BatchError),

    /// Settings could not be loaded or are invalid.
    Config(ConfigError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<ChatmodError>,
        context: ErrorContext,
    },
}

impl ChatmodError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatmodError::Action(_) => ErrorCategory::Precondition,
            ChatmodError::Queue(_) => ErrorCategory::Client,
            ChatmodError::Batch(err) => match err {
                BatchError::Http(HttpError::InvalidUrl(_)) => ErrorCategory::Client,
                BatchError::Http(_) => ErrorCategory::Network,
                BatchError::UnexpectedStatus { status: 429, .. } => ErrorCategory::RateLimited,
                BatchError::UnexpectedStatus { status, .. } if *status >= 500 => {
                    ErrorCategory::Server
                }
                BatchError::UnexpectedStatus { .. } => ErrorCategory::Client,
                BatchError::InvalidResponse(_) => ErrorCategory::Server,
                BatchError::Rejected(_) => ErrorCategory::Client,
            },
            ChatmodError::Config(ConfigError::Io { .. }) => ErrorCategory::System,
            ChatmodError::Config(_) => ErrorCategory::Configuration,
            ChatmodError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatmodError::Batch(err) => err.is_retryable(),
            ChatmodError::WithContext { error, .. } => error.is_retryable(),
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatmodError::WithContext { error, context } => {
                format!("{}\n\nContext: {}", error.user_message(), context)
            }
            other => format!("{}: {}", other.category().description(), other),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatmodError::Action(err) => err.error_code(),
            ChatmodError::Queue(QueueError::InvalidMaxCount) => "QUEUE_INVALID_MAX_COUNT",
            ChatmodError::Queue(QueueError::NoRuntime) => "QUEUE_NO_RUNTIME",
            ChatmodError::Batch(err) => err.error_code(),
            ChatmodError::Config(err) => err.error_code(),
            ChatmodError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        ChatmodError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ChatmodError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &ChatmodError {
        match self {
            ChatmodError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ChatmodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatmodError::Action(err) => write!(f, "{}", err),
            ChatmodError::Queue(err) => write!(f, "{}", err),
            ChatmodError::Batch(err) => write!(f, "{}", err),
            ChatmodError::Config(err) => write!(f, "{}", err),
            ChatmodError::WithContext { error, context } => {
                write!(f, "{} ({})", error, context)
            }
        }
    }
}

impl std::error::Error for ChatmodError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatmodError::Action(err) => Some(err),
            ChatmodError::Queue(err) => Some(err),
            ChatmodError::Batch(err) => Some(err),
            ChatmodError::Config(err) => Some(err),
            ChatmodError::WithContext { error, .. } => error.source(),
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<ActionError> for ChatmodError {
    fn from(err: ActionError) -> Self {
        ChatmodError::Action(err)
    }
}

impl From<QueueError> for ChatmodError {
    fn from(err: QueueError) -> Self {
        ChatmodError::Queue(err)
    }
}

impl From<BatchError> for ChatmodError {
    fn from(err: BatchError) -> Self {
        ChatmodError::Batch(err)
    }
}

impl From<ConfigError> for ChatmodError {
    fn from(err: ConfigError) -> Self {
        ChatmodError::Config(err)
    }
}

impl From<HttpError> for ChatmodError {
    fn from(err: HttpError) -> Self {
        ChatmodError::Batch(BatchError::Http(err))
    }
}
