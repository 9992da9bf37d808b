//! Tokio driver for [`ClickDisambiguator`].
//!
//! Owns the state machine and an [`ActionExecutor`], and runs a background
//! timer task that fires deferred actions when their deadline passes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::action::{ActionExecutor, ResolvedAction};
use super::config::ClickConfig;
use super::disambiguator::{ClickDisambiguator, GesturePhase};
use super::event::{ClickEvent, ClickOutcome, MouseButton};
use super::target::ClickTarget;

struct Shared<E> {
    machine: Mutex<ClickDisambiguator>,
    executor: E,
    /// Signalled whenever the deferral slot may have changed.
    wake: Notify,
}

impl<E: ActionExecutor> Shared<E> {
    fn machine(&self) -> MutexGuard<'_, ClickDisambiguator> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn execute(&self, action: Option<&ResolvedAction>) {
        if let Some(action) = action {
            self.executor.execute(action);
        }
    }
}

/// Click handling with deferred actions fired by a tokio timer.
///
/// Event handlers return synchronously; the lock on the state machine is
/// never held while the executor runs.
///
/// # Example
///
/// ```ignore
/// use chatmod::click::{ClickConfig, ClickEvent, ClickService};
///
/// let service = ClickService::start(ClickConfig::default(), executor);
/// service.on_key_down("Backspace");
/// service.on_mouse_down(MouseButton::Primary, Instant::now());
/// let outcome = service.on_click(&ClickEvent::new(1, Instant::now()), &target);
/// ```
pub struct ClickService<E: ActionExecutor + 'static> {
    shared: Arc<Shared<E>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<E: ActionExecutor + 'static> ClickService<E> {
    /// Start the service. Must be called within a tokio runtime.
    pub fn start(config: ClickConfig, executor: E) -> Self {
        let shared = Arc::new(Shared {
            machine: Mutex::new(ClickDisambiguator::new(config)),
            executor,
            wake: Notify::new(),
        });
        let timer = tokio::spawn(run_timer(Arc::clone(&shared)));
        tracing::debug!("Click service started");

        Self {
            shared,
            timer: Mutex::new(Some(timer)),
        }
    }

    pub fn executor(&self) -> &E {
        &self.shared.executor
    }

    pub fn phase(&self) -> GesturePhase {
        self.shared.machine().phase()
    }

    pub fn config(&self) -> ClickConfig {
        self.shared.machine().config().clone()
    }

    /// Swap in a new configuration, dropping any deferred action.
    pub fn set_config(&self, config: ClickConfig) {
        self.shared.machine().set_config(config);
        self.shared.wake.notify_one();
    }

    pub fn on_key_down(&self, key: &str) {
        self.shared.machine().on_key_down(key);
    }

    pub fn on_key_up(&self, key: &str) {
        self.shared.machine().on_key_up(key);
    }

    pub fn on_blur(&self) {
        self.shared.machine().on_blur();
    }

    pub fn on_mouse_down(&self, button: MouseButton, at: Instant) {
        self.shared.machine().on_mouse_down(button, at);
    }

    /// Handle a click; an immediate action runs before this returns.
    pub fn on_click(&self, event: &ClickEvent, target: &ClickTarget) -> ClickOutcome {
        let outcome = self.shared.machine().on_click(event, target);
        self.shared.execute(outcome.fired.as_ref());
        self.shared.wake.notify_one();
        outcome
    }

    pub fn is_running(&self) -> bool {
        self.timer_handle()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the timer task and reset all click state.
    ///
    /// Deferred actions that have not fired are dropped.
    pub fn stop(&self) {
        if let Some(handle) = self.timer_handle().take() {
            handle.abort();
            tracing::debug!("Click service stopped");
        }
        self.shared.machine().reset();
    }

    fn timer_handle(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: ActionExecutor + 'static> Drop for ClickService<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer_handle().take() {
            handle.abort();
        }
    }
}

async fn run_timer<E: ActionExecutor>(shared: Arc<Shared<E>>) {
    loop {
        let deadline = shared.machine().next_deadline();
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = shared.wake.notified() => {}
                    _ = tokio::time::sleep_until(deadline) => {
                        let fired = shared.machine().fire_due(Instant::now());
                        shared.execute(fired.as_ref());
                    }
                }
            }
            None => shared.wake.notified().await,
        }
    }
}
