//! Single/double/triple click disambiguation.
//!
//! The browser reports the click count of a gesture in `detail`, but it
//! fires one click event per click: a triple click arrives as `detail` 1,
//! then 2, then 3. When gestures are bound to different actions the lower
//! counts must wait and see whether a higher one follows. This module owns
//! that waiting.
//!
//! # Usage
//!
//! ```ignore
//! use chatmod::click::{ClickConfig, ClickDisambiguator, ClickEvent, MouseButton};
//!
//! let mut clicks = ClickDisambiguator::new(ClickConfig::default());
//!
//! clicks.on_key_down("Backspace");
//! clicks.on_mouse_down(MouseButton::Primary, now);
//! let outcome = clicks.on_click(&ClickEvent::new(1, now), &target);
//! if outcome.prevent_default {
//!     // suppress the host's own click handling
//! }
//!
//! // later, from a timer
//! if let Some(action) = clicks.fire_due(Instant::now()) {
//!     executor.execute(&action);
//! }
//! ```

use tokio::time::{Duration, Instant};
use tracing::debug;

use super::action::{ClickAction, Gesture, ResolvedAction};
use super::config::ClickConfig;
use super::event::{ClickEvent, ClickOutcome, MouseButton};
use super::modifier::{Modifier, PressedModifiers};
use super::preconditions;
use super::scheduler::DeferredSlot;
use super::target::ClickTarget;

/// Where the current gesture stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Nothing pending.
    Idle,
    /// A single-click action is waiting for a possible second click.
    AwaitingSecondClick,
    /// A double-click action is waiting for a possible third click.
    AwaitingThirdClick,
}

/// A deferred action, captured by value when it was scheduled.
#[derive(Debug, Clone, PartialEq)]
struct PendingAction {
    gesture: Gesture,
    action: ClickAction,
    target: ClickTarget,
    modifier_ok: bool,
    quick: bool,
}

/// Mousedown bookkeeping for the gesture in progress.
#[derive(Debug, Clone, Default)]
struct GestureState {
    mouse_down_count: u32,
    first_mouse_down: Option<Instant>,
    second_mouse_down: Option<Instant>,
    last_mouse_down: Option<Instant>,
    double_click_detected: bool,
}

impl GestureState {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Treat the latest mousedown as the first one of a fresh gesture.
    fn restart_from_latest(&mut self) {
        let latest = self.last_mouse_down;
        self.reset();
        if let Some(at) = latest {
            self.mouse_down_count = 1;
            self.first_mouse_down = Some(at);
            self.last_mouse_down = Some(at);
        }
    }

    fn is_quick_double(&self, threshold: Duration) -> bool {
        if !self.double_click_detected {
            return true;
        }
        match (self.first_mouse_down, self.second_mouse_down) {
            (Some(first), Some(second)) => second.saturating_duration_since(first) < threshold,
            _ => true,
        }
    }
}

/// Resolves raw click events into at most one action per gesture.
///
/// The disambiguator is sans-IO: it never sleeps and never runs actions
/// itself. Immediate actions come back in [`ClickOutcome::fired`]; deferred
/// ones sit in a single [`DeferredSlot`] until a driver calls
/// [`fire_due`](Self::fire_due) at or after [`next_deadline`](Self::next_deadline).
/// [`ClickService`](super::ClickService) is the tokio driver.
///
/// # Rules
///
/// 1. `detail == 1`: if a double-click action is bound and reachable, and
///    the single click needs no modifier, the single action is deferred by
///    `click_timeout`. Otherwise it fires now if its modifier is held.
/// 2. `detail == 2`: cancels a deferred single. The double action fires now,
///    or is deferred when triple detection is on and the double and triple
///    modifiers are the same. It only fires for a quick double click.
/// 3. `detail >= 3`: cancels a deferred double and fires the triple action
///    if its modifier is held. Ignored when triple detection is off.
/// 4. A click more than `selection_hold_timeout` after the gesture's first
///    mousedown ends a text selection: counters and modifiers are reset.
#[derive(Debug)]
pub struct ClickDisambiguator {
    config: ClickConfig,
    pressed: PressedModifiers,
    gesture: GestureState,
    pending: DeferredSlot<PendingAction>,
}

impl ClickDisambiguator {
    pub fn new(config: ClickConfig) -> Self {
        Self {
            config,
            pressed: PressedModifiers::new(),
            gesture: GestureState::default(),
            pending: DeferredSlot::new(),
        }
    }

    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Replace the configuration. Any deferred action is dropped.
    pub fn set_config(&mut self, config: ClickConfig) {
        self.pending.cancel();
        self.gesture.reset();
        self.config = config;
    }

    pub fn pressed(&self) -> &PressedModifiers {
        &self.pressed
    }

    pub fn phase(&self) -> GesturePhase {
        match self.pending.peek().map(|pending| pending.gesture) {
            Some(Gesture::Double) => GesturePhase::AwaitingThirdClick,
            Some(_) => GesturePhase::AwaitingSecondClick,
            None => GesturePhase::Idle,
        }
    }

    /// Deadline of the deferred action, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Track a keydown. Keys that are not modifiers are ignored.
    pub fn on_key_down(&mut self, key: &str) {
        if let Some(modifier) = Modifier::from_key(key) {
            self.pressed.press(modifier);
        }
    }

    pub fn on_key_up(&mut self, key: &str) {
        if let Some(modifier) = Modifier::from_key(key) {
            self.pressed.release(modifier);
        }
    }

    /// Focus left the window; keyup events for held keys will never arrive.
    pub fn on_blur(&mut self) {
        self.pressed.clear();
    }

    pub fn on_mouse_down(&mut self, button: MouseButton, at: Instant) {
        if button != MouseButton::Primary {
            return;
        }

        if let Some(first) = self.gesture.first_mouse_down {
            if at.saturating_duration_since(first) > self.config.selection_hold_timeout() {
                self.gesture.reset();
            }
        }

        self.gesture.mouse_down_count += 1;
        self.gesture.last_mouse_down = Some(at);
        match self.gesture.mouse_down_count {
            1 => self.gesture.first_mouse_down = Some(at),
            2 => {
                self.gesture.second_mouse_down = Some(at);
                self.gesture.double_click_detected = true;
            }
            _ => {}
        }
    }

    /// Handle a click on `target`.
    ///
    /// Never fails: precondition failures are logged and the action is
    /// skipped.
    pub fn on_click(&mut self, event: &ClickEvent, target: &ClickTarget) -> ClickOutcome {
        if event.button != MouseButton::Primary || event.detail == 0 {
            return ClickOutcome::ignored();
        }

        if let Some(first) = self.gesture.first_mouse_down {
            let held_for = event.at.saturating_duration_since(first);
            if held_for > self.config.selection_hold_timeout() {
                debug!(
                    detail = event.detail,
                    held_ms = held_for.as_millis() as u64,
                    "Click ended a text selection, resetting gesture"
                );
                self.gesture.reset();
                self.pressed.clear();
                return ClickOutcome::ignored();
            }
        }

        let held = self.pressed.snapshot(event.shift_key);
        match event.detail {
            1 => self.handle_single(event, target, &held),
            2 => self.handle_double(event, target, &held),
            _ => self.handle_triple(target, &held),
        }
    }

    /// Run the deferred action if its deadline has passed.
    ///
    /// A deferred single click is dropped when a second mousedown arrived
    /// in the meantime.
    pub fn fire_due(&mut self, now: Instant) -> Option<ResolvedAction> {
        let pending = self.pending.take_due(now)?;

        if pending.gesture == Gesture::Single {
            if self.gesture.double_click_detected {
                debug!("Deferred single click superseded by a second click");
                return None;
            }
            self.gesture.reset();
        }

        self.run(pending)
    }

    /// Drop any deferred action and forget all gesture and modifier state.
    pub fn reset(&mut self) {
        self.pending.cancel();
        self.gesture.reset();
        self.pressed.clear();
    }

    fn handle_single(
        &mut self,
        event: &ClickEvent,
        target: &ClickTarget,
        held: &PressedModifiers,
    ) -> ClickOutcome {
        // detail 1 always opens a gesture; older mousedowns are stale
        if self.gesture.mouse_down_count > 1 {
            self.gesture.restart_from_latest();
        }

        let config = &self.config;
        if config.single_click_action.is_none() {
            return ClickOutcome::ignored();
        }

        let modifier_ok = config.single_click_modifier.satisfied_by(held);
        let double_reachable = !config.double_click_action.is_none()
            && (config.double_click_modifier.is_none()
                || config.double_click_modifier.satisfied_by(held));

        if double_reachable && config.single_click_modifier.is_none() {
            if !modifier_ok {
                return ClickOutcome::ignored();
            }
            let deadline = event.at + config.click_timeout();
            let pending = PendingAction {
                gesture: Gesture::Single,
                action: config.single_click_action,
                target: target.clone(),
                modifier_ok,
                quick: true,
            };
            debug!(action = %pending.action, "Deferring single click");
            self.pending.schedule(deadline, pending);
            return ClickOutcome::deferred();
        }

        if !modifier_ok {
            return ClickOutcome::ignored();
        }

        let pending = PendingAction {
            gesture: Gesture::Single,
            action: config.single_click_action,
            target: target.clone(),
            modifier_ok,
            quick: true,
        };
        self.gesture.reset();
        ClickOutcome::fired(self.run(pending))
    }

    fn handle_double(
        &mut self,
        event: &ClickEvent,
        target: &ClickTarget,
        held: &PressedModifiers,
    ) -> ClickOutcome {
        if let Some(superseded) = self.pending.cancel() {
            debug!(gesture = %superseded.gesture, "Pending click superseded by double click");
        }

        let quick = self
            .gesture
            .is_quick_double(self.config.double_click_hold_threshold());
        self.gesture.reset();

        let config = &self.config;
        if config.double_click_action.is_none() {
            return ClickOutcome::ignored();
        }

        let pending = PendingAction {
            gesture: Gesture::Double,
            action: config.double_click_action,
            target: target.clone(),
            modifier_ok: config.double_click_modifier.satisfied_by(held),
            quick,
        };

        if config.defer_double_click_for_triple
            && config.double_click_modifier == config.triple_click_modifier
        {
            let deadline = event.at + config.click_timeout();
            debug!(action = %pending.action, "Deferring double click");
            self.pending.schedule(deadline, pending);
            ClickOutcome::deferred()
        } else {
            ClickOutcome::fired(self.run(pending))
        }
    }

    fn handle_triple(&mut self, target: &ClickTarget, held: &PressedModifiers) -> ClickOutcome {
        self.gesture.reset();
        if !self.config.defer_double_click_for_triple {
            return ClickOutcome::ignored();
        }

        if let Some(superseded) = self.pending.cancel() {
            debug!(gesture = %superseded.gesture, "Pending click superseded by triple click");
        }

        let config = &self.config;
        if config.triple_click_action.is_none() {
            return ClickOutcome::ignored();
        }

        let pending = PendingAction {
            gesture: Gesture::Triple,
            action: config.triple_click_action,
            target: target.clone(),
            modifier_ok: config.triple_click_modifier.satisfied_by(held),
            quick: true,
        };
        ClickOutcome::fired(self.run(pending))
    }

    /// Check a pending action and turn it into a [`ResolvedAction`].
    fn run(&mut self, pending: PendingAction) -> Option<ResolvedAction> {
        let PendingAction {
            gesture,
            action,
            target,
            modifier_ok,
            quick,
        } = pending;

        if action.is_none() || !modifier_ok {
            return None;
        }

        if gesture == Gesture::Double {
            if !quick {
                debug!("Double click held past threshold, treating as selection");
                return None;
            }
            if !target.channel.permissions.send_messages {
                debug!(channel_id = %target.channel.id, "Double click in read-only channel");
                return None;
            }
        }

        match preconditions::resolve(action, &target) {
            Ok(concrete) => {
                self.pressed.clear();
                let mut resolved = ResolvedAction::new(gesture, concrete, target);
                if concrete == ClickAction::React {
                    resolved = resolved.with_reaction(self.config.reaction_emoji.clone());
                }
                debug!(
                    gesture = %gesture,
                    action = %concrete,
                    message_id = %resolved.target.message.id,
                    "Click action resolved"
                );
                Some(resolved)
            }
            Err(err) => {
                debug!(
                    gesture = %gesture,
                    action = %action,
                    code = err.error_code(),
                    "Click action skipped: {}",
                    err
                );
                None
            }
        }
    }
}

impl Default for ClickDisambiguator {
    fn default() -> Self {
        Self::new(ClickConfig::default())
    }
}
