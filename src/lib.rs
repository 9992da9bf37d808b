//! chatmod - click gesture dispatch and request coalescing for chat client mods
//!
//! - [`click`] resolves single, double and triple clicks on a message into
//!   one bound action, gated by modifier keys and timing windows.
//! - [`queue`] batches deduplicated work items for an async handler, one
//!   batch at a time, re-queuing failed batches.
//! - [`refresh`] builds signed-URL refresh and bulk deletion on the queue.

pub mod adapters;
pub mod cli;
pub mod click;
pub mod config;
pub mod error;
pub mod logging;
pub mod queue;
pub mod refresh;
pub mod traits;

pub use error::{ChatmodError, ChatmodResult};
