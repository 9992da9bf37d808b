//! Batch handlers and the worker that runs them one at a time.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::{BatchError, ChatmodError, ErrorContext};

/// Consumer of batches formed by a [`CoalescingQueue`](super::CoalescingQueue).
///
/// An `Err` puts the batch's items back into the queue.
#[async_trait]
pub trait BatchHandler<T>: Send + Sync {
    async fn handle(&self, batch: &[T]) -> Result<(), BatchError>;
}

/// Adapts an async closure taking an owned batch.
pub struct FnHandler<T, F> {
    f: F,
    _item: PhantomData<fn(T)>,
}

impl<T, F> FnHandler<T, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F, Fut> BatchHandler<T> for FnHandler<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(Vec<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BatchError>> + Send + 'static,
{
    async fn handle(&self, batch: &[T]) -> Result<(), BatchError> {
        (self.f)(batch.to_vec()).await
    }
}

/// Runs submitted batches through a handler strictly in submission order.
///
/// A single worker task awaits each handler call before taking the next
/// batch, so at most one batch is in flight. Failed batches are passed to
/// the `on_failure` callback given at spawn time.
///
/// The worker exits once the executor is dropped and its backlog drained.
pub struct SequentialExecutor<T> {
    tx: mpsc::UnboundedSender<Vec<T>>,
}

impl<T: Send + Sync + 'static> SequentialExecutor<T> {
    pub fn spawn<F>(runtime: &Handle, handler: Arc<dyn BatchHandler<T>>, on_failure: F) -> Self
    where
        F: Fn(Vec<T>) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<T>>();

        runtime.spawn(async move {
            let mut failures: u32 = 0;
            while let Some(batch) = rx.recv().await {
                let size = batch.len();
                match handler.handle(&batch).await {
                    Ok(()) => {
                        failures = 0;
                        tracing::debug!(size, "Batch handled");
                    }
                    Err(err) => {
                        let err = ChatmodError::from(err).with_context(
                            ErrorContext::new("handle_batch")
                                .with_component("queue")
                                .with_batch_size(size)
                                .with_prior_failures(failures),
                        );
                        failures = failures.saturating_add(1);
                        if err.category().is_expected() {
                            tracing::debug!(
                                code = err.error_code(),
                                "Batch deferred, re-queuing items: {}",
                                err
                            );
                        } else {
                            tracing::warn!(
                                code = err.error_code(),
                                category = %err.category(),
                                retryable = err.is_retryable(),
                                "Batch handler failed, re-queuing items: {}",
                                err
                            );
                        }
                        on_failure(batch);
                    }
                }
            }
            tracing::trace!("Sequential executor stopped");
        });

        Self { tx }
    }

    /// Queue a batch behind any earlier ones.
    ///
    /// Returns `false` if the worker is gone.
    pub fn submit(&self, batch: Vec<T>) -> bool {
        self.tx.send(batch).is_ok()
    }
}
