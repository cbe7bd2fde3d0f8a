// ABOUTME: Task descriptor type wrapping a pure async body with retry metadata
// ABOUTME: Tasks are cheap to clone and carry no execution state of their own

pub mod error;
pub mod retry;

pub use error::TaskError;
pub use retry::RetryPolicy;

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

type TaskBody<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, TaskError>> + Send + Sync>;

/// A named unit of pure computation with a retry policy.
///
/// The body must be free of hidden shared mutable state and safe to
/// re-invoke on retry; each attempt receives a fresh clone of the input.
pub struct Task<I, O> {
    name: String,
    body: TaskBody<I, O>,
    retry: RetryPolicy,
}

impl<I, O> Task<I, O> {
    /// Wrap an async function as a task with no retries.
    pub fn new<F, Fut>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, TaskError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(move |input| body(input).boxed()),
            retry: RetryPolicy::none(),
        }
    }

    /// Attach a retry policy governing failed attempts.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) fn body(&self) -> TaskBody<I, O> {
        Arc::clone(&self.body)
    }
}

impl<I, O> Clone for Task<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            body: Arc::clone(&self.body),
            retry: self.retry.clone(),
        }
    }
}

impl<I, O> std::fmt::Debug for Task<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_task_body_invocation() {
        let task = Task::new("double", |input: i64| async move { Ok(input * 2) });

        assert_eq!(task.name(), "double");
        assert_eq!((task.body())(21).await, Ok(42));
    }

    #[tokio::test]
    async fn test_task_retry_metadata() {
        let task = Task::new("flaky", |_: ()| async { Ok::<_, TaskError>(()) })
            .with_retry(RetryPolicy::fixed_delay(2, Duration::from_millis(10)));

        assert_eq!(task.retry().max_attempts(), 3);
    }

    #[tokio::test]
    async fn test_task_clone_shares_body() {
        let task = Task::new("fail", |_: ()| async {
            Err::<(), _>(TaskError::attempt("boom"))
        });
        let cloned = task.clone();

        assert_eq!(
            (cloned.body())(()).await,
            Err(TaskError::attempt("boom"))
        );
    }
}
