//! Precondition failures for click actions.
//!
//! None of these reach the user: the click layer logs them at debug level
//! and skips the action.

use thiserror::Error;

/// Why a resolved click action was not executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The message was deleted before the action could run.
    #[error("message {message_id} is deleted")]
    MessageDeleted { message_id: String },

    /// The current user lacks a channel permission the action needs.
    #[error("missing {permission} permission in channel {channel_id}")]
    MissingPermission {
        permission: &'static str,
        channel_id: String,
    },

    /// The action only applies to the current user's own messages.
    #[error("message {message_id} was not sent by the current user")]
    NotAuthor { message_id: String },

    /// An inline editor is already open on this message.
    #[error("message {message_id} is already being edited")]
    EditorOpen { message_id: String },

    /// The message type does not support the action (system messages etc.).
    #[error("{action} is not supported for {kind} messages")]
    UnsupportedMessageType {
        action: &'static str,
        kind: &'static str,
    },

    /// There is no thread attached to the message.
    #[error("message {message_id} has no thread")]
    NoThread { message_id: String },

    /// The message has no text content to act on.
    #[error("message {message_id} has no content")]
    EmptyContent { message_id: String },
}

impl ActionError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ActionError::MessageDeleted { .. } => "ACTION_MESSAGE_DELETED",
            ActionError::MissingPermission { .. } => "ACTION_MISSING_PERMISSION",
            ActionError::NotAuthor { .. } => "ACTION_NOT_AUTHOR",
            ActionError::EditorOpen { .. } => "ACTION_EDITOR_OPEN",
            ActionError::UnsupportedMessageType { .. } => "ACTION_UNSUPPORTED_TYPE",
            ActionError::NoThread { .. } => "ACTION_NO_THREAD",
            ActionError::EmptyContent { .. } => "ACTION_EMPTY_CONTENT",
        }
    }
}
