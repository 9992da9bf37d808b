//! Modifier keys that gate click actions.
//!
//! SHIFT, CTRL and ALT are real modifiers; BACKSPACE and DELETE are
//! pseudo-modifiers (a held key, e.g. "Backspace + click deletes").

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A key that can gate a click action while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
    Backspace,
    Delete,
}

impl Modifier {
    /// Map a DOM `KeyboardEvent.key` value to a modifier.
    ///
    /// Returns `None` for keys that are not tracked.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Shift" => Some(Modifier::Shift),
            "Control" | "Ctrl" => Some(Modifier::Ctrl),
            "Alt" => Some(Modifier::Alt),
            "Backspace" => Some(Modifier::Backspace),
            "Delete" => Some(Modifier::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Shift => "SHIFT",
            Modifier::Ctrl => "CTRL",
            Modifier::Alt => "ALT",
            Modifier::Backspace => "BACKSPACE",
            Modifier::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The modifier a gesture requires before its action may fire.
///
/// Serialized as `"NONE"` or the modifier name (`"SHIFT"`, `"BACKSPACE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModifierRequirement {
    /// No modifier may be held.
    #[default]
    None,
    /// The given modifier must be held.
    Key(Modifier),
}

impl ModifierRequirement {
    pub fn is_none(&self) -> bool {
        matches!(self, ModifierRequirement::None)
    }

    /// Check the requirement against a snapshot of held modifiers.
    pub fn satisfied_by(&self, held: &PressedModifiers) -> bool {
        match self {
            ModifierRequirement::None => held.is_empty(),
            ModifierRequirement::Key(modifier) => held.contains(*modifier),
        }
    }
}

impl fmt::Display for ModifierRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierRequirement::None => f.write_str("NONE"),
            ModifierRequirement::Key(modifier) => modifier.fmt(f),
        }
    }
}

impl FromStr for ModifierRequirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let modifier = match s.to_ascii_uppercase().as_str() {
            "NONE" => return Ok(ModifierRequirement::None),
            "SHIFT" => Modifier::Shift,
            "CTRL" => Modifier::Ctrl,
            "ALT" => Modifier::Alt,
            "BACKSPACE" => Modifier::Backspace,
            "DELETE" => Modifier::Delete,
            other => return Err(format!("unknown modifier: {}", other)),
        };
        Ok(ModifierRequirement::Key(modifier))
    }
}

impl TryFrom<String> for ModifierRequirement {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModifierRequirement> for String {
    fn from(value: ModifierRequirement) -> Self {
        value.to_string()
    }
}

impl From<Modifier> for ModifierRequirement {
    fn from(modifier: Modifier) -> Self {
        ModifierRequirement::Key(modifier)
    }
}

/// The set of modifier keys currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressedModifiers {
    keys: HashSet<Modifier>,
}

impl PressedModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, modifier: Modifier) {
        self.keys.insert(modifier);
    }

    pub fn release(&mut self, modifier: Modifier) {
        self.keys.remove(&modifier);
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.keys.contains(&modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Copy of the held set with SHIFT added when the click event itself
    /// reports `shiftKey`.
    pub fn snapshot(&self, shift_key: bool) -> PressedModifiers {
        let mut snapshot = self.clone();
        if shift_key {
            snapshot.press(Modifier::Shift);
        }
        snapshot
    }
}
