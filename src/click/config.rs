//! Gesture bindings and timing windows.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::action::ClickAction;
use super::modifier::{Modifier, ModifierRequirement};

/// Configuration for a [`ClickDisambiguator`](super::ClickDisambiguator).
///
/// Every field is independently adjustable; missing fields take their
/// defaults when deserialized.
///
/// # Example
///
/// ```ignore
/// use chatmod::click::{ClickAction, ClickConfig, Modifier, ModifierRequirement};
///
/// let config = ClickConfig::default()
///     .with_single(ClickAction::CopyLink, ModifierRequirement::Key(Modifier::Ctrl))
///     .with_click_timeout_ms(250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    pub single_click_action: ClickAction,
    pub single_click_modifier: ModifierRequirement,
    pub double_click_action: ClickAction,
    pub double_click_modifier: ModifierRequirement,
    pub triple_click_action: ClickAction,
    pub triple_click_modifier: ModifierRequirement,
    /// Window in which a later click can still change the gesture (default: 300)
    pub click_timeout_ms: u64,
    /// Max gap between the two mousedowns of a quick double click (default: 150)
    pub double_click_hold_threshold_ms: u64,
    /// Past this since the first mousedown the gesture is a text selection (default: 500)
    pub selection_hold_timeout_ms: u64,
    /// Hold back double clicks to see if a third click follows (default: true)
    pub defer_double_click_for_triple: bool,
    /// Emoji sent by the `REACT` action
    pub reaction_emoji: String,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            single_click_action: ClickAction::Delete,
            single_click_modifier: ModifierRequirement::Key(Modifier::Backspace),
            double_click_action: ClickAction::EditReply,
            double_click_modifier: ModifierRequirement::None,
            triple_click_action: ClickAction::React,
            triple_click_modifier: ModifierRequirement::None,
            click_timeout_ms: 300,
            double_click_hold_threshold_ms: 150,
            selection_hold_timeout_ms: 500,
            defer_double_click_for_triple: true,
            reaction_emoji: "💀".to_string(),
        }
    }
}

impl ClickConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the single-click gesture.
    pub fn with_single(mut self, action: ClickAction, modifier: ModifierRequirement) -> Self {
        self.single_click_action = action;
        self.single_click_modifier = modifier;
        self
    }

    /// Bind the double-click gesture.
    pub fn with_double(mut self, action: ClickAction, modifier: ModifierRequirement) -> Self {
        self.double_click_action = action;
        self.double_click_modifier = modifier;
        self
    }

    /// Bind the triple-click gesture.
    pub fn with_triple(mut self, action: ClickAction, modifier: ModifierRequirement) -> Self {
        self.triple_click_action = action;
        self.triple_click_modifier = modifier;
        self
    }

    pub fn with_click_timeout_ms(mut self, ms: u64) -> Self {
        self.click_timeout_ms = ms;
        self
    }

    pub fn with_double_click_hold_threshold_ms(mut self, ms: u64) -> Self {
        self.double_click_hold_threshold_ms = ms;
        self
    }

    pub fn with_selection_hold_timeout_ms(mut self, ms: u64) -> Self {
        self.selection_hold_timeout_ms = ms;
        self
    }

    pub fn with_defer_double_click_for_triple(mut self, defer: bool) -> Self {
        self.defer_double_click_for_triple = defer;
        self
    }

    pub fn with_reaction_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.reaction_emoji = emoji.into();
        self
    }

    pub fn click_timeout(&self) -> Duration {
        Duration::from_millis(self.click_timeout_ms)
    }

    pub fn double_click_hold_threshold(&self) -> Duration {
        Duration::from_millis(self.double_click_hold_threshold_ms)
    }

    pub fn selection_hold_timeout(&self) -> Duration {
        Duration::from_millis(self.selection_hold_timeout_ms)
    }

    /// Reject timing combinations the state machine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.click_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "click_timeout_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.selection_hold_timeout_ms < self.double_click_hold_threshold_ms {
            return Err(ConfigError::Invalid {
                field: "selection_hold_timeout_ms",
                reason: format!(
                    "{} is shorter than double_click_hold_threshold_ms ({})",
                    self.selection_hold_timeout_ms, self.double_click_hold_threshold_ms
                ),
            });
        }
        if self.triple_click_action == ClickAction::React && self.reaction_emoji.is_empty() {
            return Err(ConfigError::Invalid {
                field: "reaction_emoji",
                reason: "must not be empty when REACT is bound".to_string(),
            });
        }
        Ok(())
    }
}
