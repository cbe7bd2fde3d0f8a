// ABOUTME: Future handle to the eventual outcome of a submitted invocation
// ABOUTME: Built on a watch channel so every reader observes one terminal state

use std::time::Duration;

use tokio::sync::watch;

use crate::task::TaskError;

/// Lifecycle of a submitted invocation as seen through its future.
///
/// A future moves from `Pending` to exactly one terminal state and never
/// transitions back.
#[derive(Debug, Clone)]
pub enum FutureState<O> {
    Pending,
    Succeeded(O),
    Failed(TaskError),
}

impl<O> FutureState<O> {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, FutureState::Pending)
    }
}

/// Handle to the eventual result of a submitted task.
///
/// Clones share the same underlying invocation; any number of readers may
/// await `result` and all observe the identical terminal outcome without
/// re-executing the task.
#[derive(Clone)]
pub struct TaskFuture<O> {
    task_name: String,
    state: watch::Receiver<FutureState<O>>,
}

impl<O> std::fmt::Debug for TaskFuture<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFuture")
            .field("task_name", &self.task_name)
            .field("resolved", &self.state.borrow().is_resolved())
            .finish()
    }
}

impl<O: Clone> TaskFuture<O> {
    pub(crate) fn new(task_name: impl Into<String>, state: watch::Receiver<FutureState<O>>) -> Self {
        Self {
            task_name: task_name.into(),
            state,
        }
    }

    /// Name of the task this future belongs to.
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Whether the invocation has reached a terminal state.
    pub fn is_resolved(&self) -> bool {
        self.state.borrow().is_resolved()
    }

    /// Await the terminal outcome of the invocation, including its retries.
    ///
    /// Failures are returned with the original error preserved. Repeated
    /// calls return the same outcome.
    pub async fn result(&mut self) -> Result<O, TaskError> {
        loop {
            if let Some(outcome) = Self::terminal(&self.state.borrow_and_update()) {
                return outcome;
            }

            if self.state.changed().await.is_err() {
                // Worker dropped the sender; check for a final value that
                // landed before the drop.
                return Self::terminal(&self.state.borrow()).unwrap_or(Err(TaskError::WorkerLost));
            }
        }
    }

    /// Await the outcome, giving up after `timeout`.
    ///
    /// A timeout resolves this call with `TaskError::ResultTimeout` but does
    /// not affect the invocation, which keeps running to completion.
    pub async fn result_timeout(&mut self, timeout: Duration) -> Result<O, TaskError> {
        match tokio::time::timeout(timeout, self.result()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TaskError::ResultTimeout { timeout }),
        }
    }

    fn terminal(state: &FutureState<O>) -> Option<Result<O, TaskError>> {
        match state {
            FutureState::Pending => None,
            FutureState::Succeeded(value) => Some(Ok(value.clone())),
            FutureState::Failed(error) => Some(Err(error.clone())),
        }
    }
}
