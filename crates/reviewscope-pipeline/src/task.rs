//! Abort-on-drop ownership of background futures.

use futures_util::future::{AbortHandle, abortable};
use std::future::Future;

/// Handle to a cancellable future. Dropping it aborts the future.
///
/// Once aborted, the wrapped future is never polled again, so no pending tick,
/// retry delay or request continuation runs afterwards.
#[derive(Debug)]
pub struct TaskHandle {
    abort: AbortHandle,
}

impl TaskHandle {
    /// Abort the future now.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Whether [`Self::abort`] ran or the handle was dropped.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Wrap `future` so it can be cancelled through the returned handle.
///
/// The wrapped future resolves to `None` when aborted.
pub fn cancellable<F>(future: F) -> (TaskHandle, impl Future<Output = Option<F::Output>>)
where
    F: Future,
{
    let (future, abort) = abortable(future);
    (TaskHandle { abort }, async move { future.await.ok() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_further_work() {
        let ticks = Cell::new(0_u32);
        let (handle, task) = cancellable(async {
            while ticks.get() < 100 {
                ticks.set(ticks.get() + 1);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        });
        let stopper = async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            drop(handle);
        };
        let (outcome, ()) = tokio::join!(task, stopper);
        assert!(outcome.is_none());
        assert_eq!(ticks.get(), 2);
    }

    #[tokio::test]
    async fn completed_future_yields_its_output() {
        let (handle, task) = cancellable(async { 7 });
        assert_eq!(task.await, Some(7));
        assert!(!handle.is_aborted());
        handle.abort();
        assert!(handle.is_aborted());
    }
}
