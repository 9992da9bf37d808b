//! Click gesture handling for message actions.
//!
//! Resolves single, double and triple clicks on a message into one bound
//! action, gated by held modifier keys and timing windows.

pub mod action;
pub mod config;
pub mod disambiguator;
pub mod event;
pub mod modifier;
pub mod preconditions;
pub mod scheduler;
pub mod service;
pub mod target;

pub use action::{ActionExecutor, ClickAction, Gesture, ResolvedAction};
pub use config::ClickConfig;
pub use disambiguator::{ClickDisambiguator, GesturePhase};
pub use event::{ClickEvent, ClickOutcome, MouseButton};
pub use modifier::{Modifier, ModifierRequirement, PressedModifiers};
pub use scheduler::DeferredSlot;
pub use service::ClickService;
pub use target::{ChannelPermissions, ChannelSnapshot, ClickTarget, MessageKind, MessageSnapshot};
