// ABOUTME: One task execution bound to concrete input, including its retries
// ABOUTME: Drives the sequential attempt loop with policy-controlled delays

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::clock::Clock;
use crate::task::{Task, TaskError};

/// A task bound to an input snapshot, ready to run on a worker.
///
/// Attempts are sequential, never speculative: success on any attempt
/// resolves immediately, and every retry re-runs the full body on a fresh
/// clone of the input.
pub(crate) struct Invocation<I, O> {
    task: Task<I, O>,
    input: I,
    clock: Arc<dyn Clock>,
}

impl<I, O> Invocation<I, O>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
{
    pub(crate) fn new(task: Task<I, O>, input: I, clock: Arc<dyn Clock>) -> Self {
        Self { task, input, clock }
    }

    /// Execute attempts until success or the retry budget is exhausted.
    pub(crate) async fn run(self) -> Result<O, TaskError> {
        let policy = self.task.retry().clone();
        let max_attempts = policy.max_attempts();
        let body = self.task.body();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let started_at = Utc::now();
            debug!(
                task = %self.task.name(),
                attempt,
                max_attempts,
                %started_at,
                "starting attempt"
            );

            match body(self.input.clone()).await {
                Ok(value) => {
                    debug!(task = %self.task.name(), attempt, "attempt succeeded");
                    return Ok(value);
                }
                Err(error) => {
                    warn!(
                        task = %self.task.name(),
                        attempt,
                        max_attempts,
                        %error,
                        "attempt failed"
                    );
                    last_error = Some(error);

                    if attempt < max_attempts {
                        let delay = policy.delay_for(attempt - 1);
                        debug!(task = %self.task.name(), ?delay, "waiting before retry");
                        self.clock.sleep(delay).await;
                    }
                }
            }
        }

        let last = last_error.expect("at least one attempt must have run");
        warn!(
            task = %self.task.name(),
            attempts = max_attempts,
            "retries exhausted"
        );
        Err(TaskError::RetriesExhausted {
            attempts: max_attempts,
            source: Box::new(last),
        })
    }
}
