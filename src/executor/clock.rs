// ABOUTME: Delay provider seam used for inter-attempt retry waits
// ABOUTME: Substitutable with a fake clock for deterministic retry testing

use std::time::Duration;

use async_trait::async_trait;

/// Provides the delay between retry attempts.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
