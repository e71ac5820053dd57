use async_trait::async_trait;
use reviewscope_pipeline::Timer;
use std::time::Duration;

/// `setTimeout`-backed timer.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GlooTimer;

#[async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
