//! Permission and state checks run before an action executes.

use crate::error::ActionError;

use super::action::ClickAction;
use super::target::ClickTarget;

/// Check `action` against `target` and return the concrete action to run.
///
/// `EditReply` resolves to `Edit` for the current user's messages and to
/// `Reply` otherwise; every other action resolves to itself. `None` passes
/// through unchanged and is never executed by callers.
pub fn resolve(action: ClickAction, target: &ClickTarget) -> Result<ClickAction, ActionError> {
    let message = &target.message;
    let permissions = &target.channel.permissions;

    if message.deleted {
        return Err(ActionError::MessageDeleted {
            message_id: message.id.clone(),
        });
    }

    let action = match action {
        ClickAction::EditReply if message.own => ClickAction::Edit,
        ClickAction::EditReply => ClickAction::Reply,
        other => other,
    };

    match action {
        ClickAction::Delete => {
            if !permissions.manage_messages && (!message.own || message.kind.is_system()) {
                return Err(if message.own {
                    missing("MANAGE_MESSAGES", target)
                } else {
                    ActionError::NotAuthor {
                        message_id: message.id.clone(),
                    }
                });
            }
        }
        ClickAction::Edit => {
            if !message.own {
                return Err(ActionError::NotAuthor {
                    message_id: message.id.clone(),
                });
            }
            if message.kind.is_system() {
                return Err(unsupported(action, target));
            }
            if target.is_editing() {
                return Err(ActionError::EditorOpen {
                    message_id: message.id.clone(),
                });
            }
        }
        ClickAction::Reply => {
            if !permissions.send_messages {
                return Err(missing("SEND_MESSAGES", target));
            }
            if !message.kind.is_replyable() {
                return Err(unsupported(action, target));
            }
        }
        ClickAction::Quote => {
            if !permissions.send_messages {
                return Err(missing("SEND_MESSAGES", target));
            }
            if message.content.trim().is_empty() {
                return Err(ActionError::EmptyContent {
                    message_id: message.id.clone(),
                });
            }
        }
        ClickAction::Pin => {
            if !permissions.manage_messages {
                return Err(missing("MANAGE_MESSAGES", target));
            }
            if !message.kind.is_pinnable() {
                return Err(unsupported(action, target));
            }
        }
        ClickAction::React => {
            if !permissions.add_reactions {
                return Err(missing("ADD_REACTIONS", target));
            }
        }
        ClickAction::OpenThread => {
            if message.thread_id.is_none() {
                return Err(ActionError::NoThread {
                    message_id: message.id.clone(),
                });
            }
        }
        ClickAction::None
        | ClickAction::CopyLink
        | ClickAction::CopyId
        | ClickAction::CopyContent
        | ClickAction::CopyUserId
        | ClickAction::OpenTab
        | ClickAction::EditReply => {}
    }

    Ok(action)
}

fn missing(permission: &'static str, target: &ClickTarget) -> ActionError {
    ActionError::MissingPermission {
        permission,
        channel_id: target.channel.id.clone(),
    }
}

fn unsupported(action: ClickAction, target: &ClickTarget) -> ActionError {
    ActionError::UnsupportedMessageType {
        action: action.as_str(),
        kind: target.message.kind.as_str(),
    }
}
