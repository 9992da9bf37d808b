//! Common test utilities for integration tests.
//!
//! Fixtures for click targets and a programmable batch handler that records
//! what the queue hands it.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chatmod::click::{
    ChannelPermissions, ChannelSnapshot, ClickTarget, MessageKind, MessageSnapshot,
};
use chatmod::error::BatchError;
use chatmod::queue::BatchHandler;
use tokio::sync::Notify;

/// A message by someone else in a guild channel, with member permissions.
pub fn other_message() -> ClickTarget {
    ClickTarget {
        message: MessageSnapshot {
            id: "900".to_string(),
            channel_id: "30".to_string(),
            author_id: "2".to_string(),
            content: "look at this".to_string(),
            kind: MessageKind::Default,
            deleted: false,
            own: false,
            thread_id: None,
        },
        channel: ChannelSnapshot {
            id: "30".to_string(),
            guild_id: Some("1".to_string()),
            permissions: ChannelPermissions::member(),
            editing_message_id: None,
        },
    }
}

/// A message written by the current user.
pub fn own_message() -> ClickTarget {
    let mut target = other_message();
    target.message.own = true;
    target
}

/// Let spawned tasks run without advancing the paused clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// What the handler should do with the next batch.
#[derive(Debug, Clone)]
pub enum Step {
    Succeed,
    Fail,
    /// Wait for [`RecordingHandler::release`] before succeeding.
    Block,
    /// Wait for [`RecordingHandler::release`], then fail.
    BlockThenFail,
}

/// Batch handler that records calls and follows a script of outcomes.
///
/// Once the script runs out every batch succeeds.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    in_flight: Arc<Mutex<usize>>,
    max_in_flight: Arc<Mutex<usize>>,
    script: Arc<Mutex<VecDeque<Step>>>,
    gate: Arc<Notify>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(steps: impl IntoIterator<Item = Step>) -> Self {
        let handler = Self::new();
        handler.script.lock().unwrap().extend(steps);
        handler
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    /// Let one blocked batch finish.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl BatchHandler<String> for RecordingHandler {
    async fn handle(&self, batch: &[String]) -> Result<(), BatchError> {
        self.batches.lock().unwrap().push(batch.to_vec());
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            *in_flight += 1;
            let mut max = self.max_in_flight.lock().unwrap();
            *max = (*max).max(*in_flight);
        }

        let step = self.script.lock().unwrap().pop_front().unwrap_or(Step::Succeed);
        let result = match step {
            Step::Succeed => Ok(()),
            Step::Fail => Err(BatchError::Rejected("scripted failure".to_string())),
            Step::Block => {
                self.gate.notified().await;
                Ok(())
            }
            Step::BlockThenFail => {
                self.gate.notified().await;
                Err(BatchError::Rejected("scripted failure".to_string()))
            }
        };

        *self.in_flight.lock().unwrap() -= 1;
        result
    }
}

pub fn s(value: &str) -> String {
    value.to_string()
}
