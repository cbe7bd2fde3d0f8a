// ABOUTME: Error types for task execution and result retrieval
// ABOUTME: Defines the failure taxonomy surfaced through task futures

use std::time::Duration;
use thiserror::Error;

/// Failures a task invocation or its future can surface.
///
/// Errors are cloneable so that every reader of a shared future observes
/// the identical terminal outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    #[error("task attempt failed: {0}")]
    Attempt(String),

    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<TaskError>,
    },

    #[error("timed out waiting for result after {timeout:?}")]
    ResultTimeout { timeout: Duration },

    #[error("worker dropped before resolving the future")]
    WorkerLost,
}

impl TaskError {
    /// Build a transient attempt failure from any displayable reason.
    pub fn attempt(message: impl Into<String>) -> Self {
        TaskError::Attempt(message.into())
    }

    /// The underlying error of an exhausted retry sequence, if any.
    pub fn last_error(&self) -> Option<&TaskError> {
        match self {
            TaskError::RetriesExhausted { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
