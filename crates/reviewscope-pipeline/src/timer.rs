//! Sleeping, abstracted over the runtime.

use async_trait::async_trait;
use std::time::Duration;

/// Source of delays for tick intervals, retry backoff and the progress ticker.
#[async_trait(?Send)]
pub trait Timer {
    /// Resolve after `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed timer for native front ends.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(feature = "tokio")]
#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
