//! Click actions and the executor seam the host implements.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::target::ClickTarget;

/// The closed set of actions a gesture can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClickAction {
    #[default]
    None,
    Delete,
    CopyLink,
    CopyId,
    CopyContent,
    CopyUserId,
    Edit,
    Reply,
    /// Edit own messages, reply to everyone else's.
    EditReply,
    Quote,
    Pin,
    React,
    OpenThread,
    OpenTab,
}

impl ClickAction {
    pub fn is_none(&self) -> bool {
        matches!(self, ClickAction::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClickAction::None => "NONE",
            ClickAction::Delete => "DELETE",
            ClickAction::CopyLink => "COPY_LINK",
            ClickAction::CopyId => "COPY_ID",
            ClickAction::CopyContent => "COPY_CONTENT",
            ClickAction::CopyUserId => "COPY_USER_ID",
            ClickAction::Edit => "EDIT",
            ClickAction::Reply => "REPLY",
            ClickAction::EditReply => "EDIT_REPLY",
            ClickAction::Quote => "QUOTE",
            ClickAction::Pin => "PIN",
            ClickAction::React => "REACT",
            ClickAction::OpenThread => "OPEN_THREAD",
            ClickAction::OpenTab => "OPEN_TAB",
        }
    }
}

impl fmt::Display for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which gesture produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Single,
    Double,
    Triple,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Single => "single",
            Gesture::Double => "double",
            Gesture::Triple => "triple",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action that passed its preconditions and is ready to run.
///
/// `action` is always concrete: `EditReply` has already been resolved to
/// `Edit` or `Reply`, and `None` never appears here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAction {
    pub gesture: Gesture,
    pub action: ClickAction,
    pub target: ClickTarget,
    /// Text for the copy actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<String>,
    /// Emoji for `React`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
}

impl ResolvedAction {
    pub fn new(gesture: Gesture, action: ClickAction, target: ClickTarget) -> Self {
        let clipboard = match action {
            ClickAction::CopyLink => Some(target.message_link()),
            ClickAction::CopyId => Some(target.message.id.clone()),
            ClickAction::CopyContent => Some(target.message.content.clone()),
            ClickAction::CopyUserId => Some(target.message.author_id.clone()),
            _ => None,
        };
        Self {
            gesture,
            action,
            target,
            clipboard,
            reaction: None,
        }
    }

    pub fn with_reaction(mut self, emoji: impl Into<String>) -> Self {
        self.reaction = Some(emoji.into());
        self
    }
}

/// Runs resolved actions against the host (delete, copy, reply, ...).
///
/// Called synchronously from the click handler or the deferral timer;
/// implementations that need async work should spawn it.
pub trait ActionExecutor: Send + Sync {
    fn execute(&self, action: &ResolvedAction);
}

impl<E: ActionExecutor + ?Sized> ActionExecutor for Arc<E> {
    fn execute(&self, action: &ResolvedAction) {
        (**self).execute(action)
    }
}
