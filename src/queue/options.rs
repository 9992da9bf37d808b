//! Batch size and inactivity timeout for a coalescing queue.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Inactivity timeout used when none is given.
pub const DEFAULT_TIMEOUT_MS: u64 = 50;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Options for a [`CoalescingQueue`](super::CoalescingQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueOptions {
    /// Largest batch handed to the handler; reaching it flushes at once.
    pub max_count: usize,
    /// Quiet period after the last `add` before a partial batch is flushed.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl QueueOptions {
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        if self.max_count == 0 {
            return Err(QueueError::InvalidMaxCount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let options = QueueOptions::new(10);
        assert_eq!(options.timeout(), Duration::from_millis(50));

        let parsed: QueueOptions = serde_json::from_str(r#"{"max_count": 5}"#).unwrap();
        assert_eq!(parsed, QueueOptions::new(5));
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            QueueOptions::new(0).validate(),
            Err(QueueError::InvalidMaxCount)
        );
        assert!(QueueOptions::new(1).with_timeout_ms(0).validate().is_ok());
    }
}
