// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides scripted task bodies, an event log, and a recording fake clock

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tributary::executor::Clock;
use tributary::{SourceRecord, Task, TaskError};

/// Fetch task returning `source_id + 1` as the value, always succeeding.
pub fn sequential_fetch() -> Task<u32, SourceRecord> {
    Task::new("fetch-data", |source_id: u32| async move {
        Ok(SourceRecord::new(source_id, source_id as i64 + 1))
    })
}

/// Fetch task that fails for the given source ids and succeeds otherwise.
pub fn failing_fetch(failing: &[u32]) -> Task<u32, SourceRecord> {
    let failing: HashSet<u32> = failing.iter().copied().collect();
    Task::new("fetch-data", move |source_id: u32| {
        let failing = failing.clone();
        async move {
            if failing.contains(&source_id) {
                Err(TaskError::attempt(format!(
                    "source {} unavailable",
                    source_id
                )))
            } else {
                Ok(SourceRecord::new(source_id, source_id as i64 + 1))
            }
        }
    })
}

/// Task failing its first `fail_first` attempts, then returning the attempt
/// number. The counter observes how often the body actually ran.
pub fn flaky_task(fail_first: u32) -> (Task<(), u32>, Arc<AtomicU32>) {
    let attempts = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&attempts);

    let task = Task::new("flaky", move |_: ()| {
        let seen = Arc::clone(&seen);
        async move {
            let attempt = seen.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= fail_first {
                Err(TaskError::attempt(format!("attempt {} failed", attempt)))
            } else {
                Ok(attempt)
            }
        }
    });

    (task, attempts)
}

/// Task that sleeps for `duration`, counts its executions, and doubles its
/// input.
pub fn slow_doubling_task(duration: Duration) -> (Task<u32, u32>, Arc<AtomicU32>) {
    let executions = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&executions);

    let task = Task::new("slow-double", move |input: u32| {
        let seen = Arc::clone(&seen);
        async move {
            tokio::time::sleep(duration).await;
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(input * 2)
        }
    });

    (task, executions)
}

/// Ordered record of named events across concurrently running task bodies.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn index_of(&self, event: &str) -> Option<usize> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .position(|e| e.as_str() == event)
    }
}

/// Clock that records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct FakeClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
