// ABOUTME: Bounded worker pool accepting task submissions and producing futures
// ABOUTME: Concurrency is limited by a semaphore; shutdown drains in-flight work

pub mod clock;
pub mod error;
pub mod future;
mod invocation;

pub use clock::{Clock, TokioClock};
pub use error::ExecutorError;
pub use future::{FutureState, TaskFuture};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use self::error::Result;
use self::invocation::Invocation;
use crate::task::{Task, TaskError};

/// Concurrent worker pool running submitted invocations.
///
/// The pool is the only shared resource between concurrently running task
/// bodies; all access is mediated through `submit` and future resolution.
pub struct Executor {
    max_concurrent: usize,
    semaphore: Arc<Semaphore>,
    clock: Arc<dyn Clock>,
}

impl Executor {
    /// Create a pool running at most `max_concurrent` invocations at once.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            clock: Arc::new(TokioClock),
        }
    }

    /// Substitute the delay provider used between retry attempts.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Submit a task bound to an input for concurrent execution.
    ///
    /// Returns immediately with a pending future. The worker acquires a pool
    /// permit, drives the invocation (including retries) to completion, and
    /// publishes the terminal state exactly once. No ordering is guaranteed
    /// between independently submitted invocations.
    pub fn submit<I, O>(&self, task: &Task<I, O>, input: I) -> TaskFuture<O>
    where
        I: Clone + Send + 'static,
        O: Clone + Send + Sync + 'static,
    {
        let (tx, rx) = watch::channel(FutureState::Pending);
        let invocation = Invocation::new(task.clone(), input, Arc::clone(&self.clock));
        let semaphore = Arc::clone(&self.semaphore);
        let task_name = task.name().to_string();

        tokio::spawn(async move {
            let _permit = semaphore.acquire().await.expect("Semaphore closed");
            debug!(task = %task_name, "worker picked up invocation");

            let state = match invocation.run().await {
                Ok(value) => FutureState::Succeeded(value),
                Err(error) => FutureState::Failed(error),
            };

            // All readers may already be gone; the invocation still ran to
            // completion and its permit is released on drop.
            let _ = tx.send(state);
        });

        TaskFuture::new(task.name(), rx)
    }

    /// Run a task inline on the calling task instead of submitting it.
    ///
    /// Retry semantics match `submit`, but execution blocks the caller and
    /// bypasses the worker pool. Used for final flow steps that must finish
    /// before the flow completes.
    pub async fn invoke<I, O>(&self, task: &Task<I, O>, input: I) -> std::result::Result<O, TaskError>
    where
        I: Clone + Send + 'static,
        O: Send + 'static,
    {
        debug!(task = %task.name(), "invoking task inline");
        Invocation::new(task.clone(), input, Arc::clone(&self.clock))
            .run()
            .await
    }

    /// Current pool usage.
    pub fn stats(&self) -> ExecutorStats {
        let available_permits = self.semaphore.available_permits();
        ExecutorStats {
            max_concurrent: self.max_concurrent,
            available_permits,
            active_tasks: self.max_concurrent - available_permits,
        }
    }

    /// Wait for all in-flight invocations to complete.
    pub async fn drain(&self) {
        // All permits available means no workers are running.
        let _permits = self
            .semaphore
            .acquire_many(self.max_concurrent as u32)
            .await
            .expect("Semaphore closed");
    }

    /// Gracefully shut down, draining in-flight work within `timeout_duration`.
    pub async fn shutdown(&self, timeout_duration: Duration) -> Result<()> {
        info!("Shutting down executor...");

        match timeout(timeout_duration, self.drain()).await {
            Ok(()) => {
                info!("Executor shutdown completed");
                Ok(())
            }
            Err(_) => {
                warn!("Executor shutdown timed out after {:?}", timeout_duration);
                Err(ExecutorError::ShutdownTimeout {
                    timeout: timeout_duration,
                })
            }
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("max_concurrent", &self.max_concurrent)
            .field("available_permits", &self.semaphore.available_permits())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorStats {
    pub max_concurrent: usize,
    pub available_permits: usize,
    pub active_tasks: usize,
}

impl ExecutorStats {
    pub fn utilization_percentage(&self) -> f64 {
        if self.max_concurrent == 0 {
            0.0
        } else {
            (self.active_tasks as f64 / self.max_concurrent as f64) * 100.0
        }
    }
}
