// ABOUTME: Error types for worker pool lifecycle operations
// ABOUTME: Task-level failures live in task::error and travel through futures

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("shutdown timed out after {timeout:?}")]
    ShutdownTimeout { timeout: Duration },
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
