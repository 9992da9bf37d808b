//! Unified error handling for chatmod.
//!
//! - **Error Categories**: coarse classification for handling decisions
//! - **Domain errors**: [`ActionError`] (click preconditions),
//!   [`QueueError`] / [`BatchError`] (coalescing queue), [`ConfigError`]
//! - **Unified Error Type**: [`ChatmodError`]
//! - **Error Context**: [`ErrorContext`] attached via [`ResultExt`]
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | RateLimited | HTTP 429 | Yes |
//! | Server | 5xx, malformed responses | Yes |
//! | Precondition | Click action not allowed | No |
//! | Client | Rejected requests, misuse | No |
//! | System | Filesystem errors | No |
//! | Configuration | Invalid settings | No |

mod action;
mod category;
mod chatmod_error;
mod config;
mod context;
mod queue;
mod result;

pub use action::ActionError;
pub use category::ErrorCategory;
pub use chatmod_error::ChatmodError;
pub use config::ConfigError;
pub use context::ErrorContext;
pub use queue::{BatchError, QueueError};
pub use result::{ChatmodResult, ResultExt};
