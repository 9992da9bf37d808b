//! Snapshots of the message and channel a click landed on.
//!
//! Targets are plain values: a deferred action keeps its own copy, so a
//! later edit or delete in the host store cannot change what it acts on.

use serde::{Deserialize, Serialize};

/// Message types, reduced to what the action preconditions need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Default,
    Reply,
    ThreadStarter,
    ChatInputCommand,
    /// Joins, boosts, pins and other non-user messages.
    System,
}

impl MessageKind {
    pub fn is_system(&self) -> bool {
        matches!(self, MessageKind::System)
    }

    pub fn is_replyable(&self) -> bool {
        !self.is_system()
    }

    pub fn is_pinnable(&self) -> bool {
        !matches!(self, MessageKind::System | MessageKind::ThreadStarter)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Default => "default",
            MessageKind::Reply => "reply",
            MessageKind::ThreadStarter => "thread_starter",
            MessageKind::ChatInputCommand => "chat_input_command",
            MessageKind::System => "system",
        }
    }
}

/// Permissions the current user has in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelPermissions {
    pub send_messages: bool,
    pub manage_messages: bool,
    pub add_reactions: bool,
}

impl ChannelPermissions {
    /// Permissions of a regular member: may talk and react, not moderate.
    pub fn member() -> Self {
        Self {
            send_messages: true,
            manage_messages: false,
            add_reactions: true,
        }
    }

    pub fn all() -> Self {
        Self {
            send_messages: true,
            manage_messages: true,
            add_reactions: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub deleted: bool,
    /// Whether the current user wrote this message.
    #[serde(default)]
    pub own: bool,
    /// Id of the thread started from this message, if any.
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub id: String,
    /// `None` for direct messages.
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub permissions: ChannelPermissions,
    /// Message currently open in the inline editor.
    #[serde(default)]
    pub editing_message_id: Option<String>,
}

/// The `(message, channel)` pair a click handler receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTarget {
    pub message: MessageSnapshot,
    pub channel: ChannelSnapshot,
}

impl ClickTarget {
    /// Permalink to the message.
    pub fn message_link(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.channel.guild_id.as_deref().unwrap_or("@me"),
            self.channel.id,
            self.message.id
        )
    }

    pub fn is_editing(&self) -> bool {
        self.channel.editing_message_id.as_deref() == Some(self.message.id.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_message_link_guild_and_dm() {
        let mut target = message_target();
        assert_eq!(
            target.message_link(),
            "https://discord.com/channels/9/42/1100"
        );

        target.channel.guild_id = None;
        assert_eq!(
            target.message_link(),
            "https://discord.com/channels/@me/42/1100"
        );
    }

    #[test]
    fn test_is_editing() {
        let mut target = message_target();
        assert!(!target.is_editing());
        target.channel.editing_message_id = Some("1100".to_string());
        assert!(target.is_editing());
        target.channel.editing_message_id = Some("1101".to_string());
        assert!(!target.is_editing());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "message": {"id": "1", "channel_id": "2", "author_id": "3"},
            "channel": {"id": "2"}
        }"#;
        let target: ClickTarget = serde_json::from_str(json).unwrap();
        assert_eq!(target.message.kind, MessageKind::Default);
        assert!(!target.message.own);
        assert!(!target.channel.permissions.send_messages);
        assert!(target.channel.guild_id.is_none());
    }

    #[test]
    fn test_kind_rules() {
        assert!(!MessageKind::System.is_replyable());
        assert!(MessageKind::Reply.is_replyable());
        assert!(!MessageKind::ThreadStarter.is_pinnable());
        assert!(MessageKind::Default.is_pinnable());
    }
}
