//! Batched, deduplicating request queue.
//!
//! Producers call [`CoalescingQueue::add`] one item at a time; a handler
//! receives them in batches bounded by count and by an inactivity timeout,
//! never two batches at once.

pub mod coalescing;
pub mod executor;
pub mod options;

pub use coalescing::CoalescingQueue;
pub use executor::{BatchHandler, FnHandler, SequentialExecutor};
pub use options::{QueueOptions, DEFAULT_TIMEOUT_MS};
