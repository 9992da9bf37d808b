//! A slot holding at most one scheduled task.

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Scheduled<T> {
    deadline: Instant,
    task: T,
}

/// Holds at most one task with a deadline.
///
/// [`schedule`](Self::schedule) cancels whatever was pending before storing
/// the new task, so two deferred actions can never be live at once. The
/// slot does not sleep itself; a driver polls [`deadline`](Self::deadline)
/// and calls [`take_due`](Self::take_due).
#[derive(Debug, Clone)]
pub struct DeferredSlot<T> {
    entry: Option<Scheduled<T>>,
}

impl<T> Default for DeferredSlot<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T> DeferredSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `task` to run at `deadline`, returning the task it replaced.
    pub fn schedule(&mut self, deadline: Instant, task: T) -> Option<T> {
        let previous = self.cancel();
        self.entry = Some(Scheduled { deadline, task });
        previous
    }

    /// Drop the pending task, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.entry.take().map(|scheduled| scheduled.task)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.entry.as_ref().map(|scheduled| scheduled.deadline)
    }

    pub fn peek(&self) -> Option<&T> {
        self.entry.as_ref().map(|scheduled| &scheduled.task)
    }

    pub fn is_pending(&self) -> bool {
        self.entry.is_some()
    }

    /// Take the task if its deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.entry {
            Some(scheduled) if scheduled.deadline <= now => self.cancel(),
            _ => None,
        }
    }
}
