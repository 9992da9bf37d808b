//! Recording action executor for testing.

use std::sync::{Arc, Mutex};

use crate::click::{ActionExecutor, ClickAction, ResolvedAction};

/// Executor that records every action instead of running it.
///
/// Clones share the same record, so a test can keep one handle and give
/// another to a [`ClickService`](crate::click::ClickService).
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<ResolvedAction>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions executed so far, oldest first.
    pub fn executed(&self) -> Vec<ResolvedAction> {
        self.executed.lock().unwrap().clone()
    }

    /// Just the concrete actions, oldest first.
    pub fn actions(&self) -> Vec<ClickAction> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|resolved| resolved.action)
            .collect()
    }

    pub fn clear(&self) {
        self.executed.lock().unwrap().clear();
    }
}

impl ActionExecutor for RecordingExecutor {
    fn execute(&self, action: &ResolvedAction) {
        self.executed.lock().unwrap().push(action.clone());
    }
}
