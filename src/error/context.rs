//! Where and when an error happened.

use std::fmt;

use chrono::{DateTime, Utc};

/// Details attached to a [`ChatmodError`](super::ChatmodError) by
/// [`ResultExt`](super::ResultExt) or `with_context`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// What was being attempted, e.g. `"handle_batch"`.
    pub operation: String,
    /// Module that raised it: `"queue"`, `"refresh"`, `"click"`...
    pub component: Option<String>,
    pub channel_id: Option<String>,
    /// Items in the batch being handled.
    pub batch_size: Option<usize>,
    /// Earlier consecutive failures of the same operation.
    pub prior_failures: u32,
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: None,
            channel_id: None,
            batch_size: None,
            prior_failures: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn with_prior_failures(mut self, failures: u32) -> Self {
        self.prior_failures = failures;
        self
    }

    /// True once the operation has failed more than once in a row.
    pub fn is_repeated(&self) -> bool {
        self.prior_failures > 0
    }
}

impl fmt::Display for ErrorContext {
    /// `component::operation` followed by whichever details are set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(component) => write!(f, "{}::{}", component, self.operation)?,
            None => f.write_str(&self.operation)?,
        }
        if let Some(channel_id) = &self.channel_id {
            write!(f, " channel={}", channel_id)?;
        }
        if let Some(size) = self.batch_size {
            write!(f, " batch={}", size)?;
        }
        if self.prior_failures > 0 {
            write!(f, " prior_failures={}", self.prior_failures)?;
        }
        write!(f, " at {}", self.timestamp.format("%H:%M:%S%.3f"))
    }
}
