//! Pointer input as the disambiguator sees it.

use tokio::time::Instant;

use super::action::ResolvedAction;

/// Mouse button of a pointer event, from the DOM `button` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl MouseButton {
    pub fn from_dom(button: u8) -> Self {
        match button {
            0 => MouseButton::Primary,
            1 => MouseButton::Middle,
            2 => MouseButton::Secondary,
            other => MouseButton::Other(other),
        }
    }
}

/// A click event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Native click count (1, 2, 3...). Zero for keyboard activation.
    pub detail: u32,
    pub button: MouseButton,
    /// The event's own `shiftKey` flag.
    pub shift_key: bool,
    pub at: Instant,
}

impl ClickEvent {
    /// A primary-button click with the given click count.
    pub fn new(detail: u32, at: Instant) -> Self {
        Self {
            detail,
            button: MouseButton::Primary,
            shift_key: false,
            at,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }
}

/// What handling a click did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickOutcome {
    /// Action that fired immediately, if any.
    pub fired: Option<ResolvedAction>,
    /// Whether an action was scheduled behind the click timeout.
    pub deferred: bool,
    /// Whether the host must call `preventDefault()` on the event.
    pub prevent_default: bool,
}

impl ClickOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    pub fn fired(action: Option<ResolvedAction>) -> Self {
        Self {
            prevent_default: action.is_some(),
            fired: action,
            deferred: false,
        }
    }
}
