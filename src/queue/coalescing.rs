//! Deduplicating batch queue with count and inactivity triggers.
//!
//! # Usage
//!
//! ```ignore
//! use chatmod::queue::{CoalescingQueue, QueueOptions};
//!
//! let queue = CoalescingQueue::from_fn(
//!     |urls: Vec<String>| async move { refresh(urls).await },
//!     QueueOptions::new(50),
//! )?;
//!
//! queue.add(url.clone());
//! queue.add(url); // already pending, ignored
//! ```
//!
//! # Known limitation
//!
//! A handler that keeps failing makes the pending list grow without bound:
//! failed items are re-queued forever, with no backoff and no retry limit.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{BatchError, QueueError};

use super::executor::{BatchHandler, FnHandler, SequentialExecutor};
use super::options::QueueOptions;

struct QueueState<T> {
    items: Vec<T>,
    timer: Option<JoinHandle<()>>,
    /// Bumped every time the timer is re-armed or cleared.
    timer_generation: u64,
}

impl<T> QueueState<T> {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.timer_generation = self.timer_generation.wrapping_add(1);
    }
}

struct Inner<T> {
    state: Mutex<QueueState<T>>,
    options: QueueOptions,
    executor: SequentialExecutor<T>,
    runtime: Handle,
    weak_self: Weak<Inner<T>>,
}

impl<T: PartialEq + Send + Sync + 'static> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm_timer(&self, state: &mut QueueState<T>) {
        state.cancel_timer();
        let generation = state.timer_generation;
        let weak = self.weak_self.clone();
        let timeout = self.options.timeout();

        state.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = weak.upgrade() {
                inner.on_timer(generation);
            }
        }));
    }

    fn on_timer(&self, generation: u64) {
        {
            let state = self.lock();
            // re-armed or flushed since this timer was started
            if state.timer_generation != generation {
                return;
            }
        }
        tracing::trace!("Queue inactivity timer fired");
        self.flush();
    }

    /// Hand the oldest `max_count` items to the executor.
    ///
    /// Items left over (re-queued ones can push the list past `max_count`)
    /// get a fresh inactivity timer.
    fn flush(&self) {
        let batch: Vec<T> = {
            let mut state = self.lock();
            state.cancel_timer();
            if state.items.is_empty() {
                return;
            }
            let take = self.options.max_count.min(state.items.len());
            let batch: Vec<T> = state.items.drain(..take).collect();
            if !state.items.is_empty() {
                self.arm_timer(&mut state);
            }
            batch
        };

        tracing::debug!(size = batch.len(), "Flushing batch");
        if !self.executor.submit(batch) {
            tracing::warn!("Batch worker stopped, dropping batch");
        }
    }

    /// Put a failed batch back at the end of the pending list.
    ///
    /// Does not arm the timer; the items go out with the next flush, and a
    /// flush that leaves items behind re-arms it.
    fn requeue(&self, batch: Vec<T>) {
        let mut state = self.lock();
        let mut requeued = 0usize;
        for item in batch {
            if !state.items.contains(&item) {
                state.items.push(item);
                requeued += 1;
            }
        }
        tracing::debug!(requeued, pending = state.items.len(), "Re-queued failed batch");
    }
}

/// Batches items for an async handler, at most one batch at a time.
///
/// - `add` ignores items already pending.
/// - Reaching `max_count` pending items flushes immediately; otherwise a
///   flush happens `timeout_ms` after the last `add`.
/// - Batches reach the handler in the order they were formed, each one
///   only after the previous call has settled.
/// - A failed batch is re-appended to the pending list.
pub struct CoalescingQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T: PartialEq + Send + Sync + 'static> CoalescingQueue<T> {
    /// Create a queue feeding `handler`.
    ///
    /// Must be called inside a tokio runtime, which runs the timer and the
    /// batch worker.
    pub fn new<H>(handler: H, options: QueueOptions) -> Result<Self, QueueError>
    where
        H: BatchHandler<T> + 'static,
    {
        Self::with_handler(Arc::new(handler), options)
    }

    /// Create a queue from a shared handler.
    pub fn with_handler(
        handler: Arc<dyn BatchHandler<T>>,
        options: QueueOptions,
    ) -> Result<Self, QueueError> {
        options.validate()?;
        let runtime = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;

        let inner = Arc::new_cyclic(|weak: &Weak<Inner<T>>| {
            let on_failure = {
                let weak = weak.clone();
                move |batch: Vec<T>| {
                    if let Some(inner) = weak.upgrade() {
                        inner.requeue(batch);
                    }
                }
            };
            Inner {
                state: Mutex::new(QueueState {
                    items: Vec::new(),
                    timer: None,
                    timer_generation: 0,
                }),
                options,
                executor: SequentialExecutor::spawn(&runtime, handler, on_failure),
                runtime,
                weak_self: weak.clone(),
            }
        });

        Ok(Self { inner })
    }

    /// Create a queue from an async closure taking the owned batch.
    pub fn from_fn<F, Fut>(f: F, options: QueueOptions) -> Result<Self, QueueError>
    where
        T: Clone,
        F: Fn(Vec<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BatchError>> + Send + 'static,
    {
        Self::new(FnHandler::new(f), options)
    }

    pub fn options(&self) -> &QueueOptions {
        &self.inner.options
    }

    /// Add an item unless an equal one is already pending.
    pub fn add(&self, item: T) {
        let mut state = self.inner.lock();
        if state.items.contains(&item) {
            return;
        }
        state.items.push(item);

        if state.items.len() >= self.inner.options.max_count {
            drop(state);
            self.inner.flush();
        } else {
            self.inner.arm_timer(&mut state);
        }
    }
}

impl<T> Drop for CoalescingQueue<T> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.state.lock() {
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
    }
}
