//! Timer-based coalescing of rapid calls.

use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Runs only the most recent of a burst of tasks.
///
/// Each call to [`Debouncer::debounce`] aborts the pending task, so a task
/// only starts its work once `delay` has passed without another call.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `future` to run after the delay, replacing any pending task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn debounce<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            future.await;
        });
        self.pending = Some(handle.abort_handle());
    }

    /// Drop the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while the most recent task has not finished.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_runs() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for query in ["Lon", "Lond", "London"] {
            let tx = tx.clone();
            debouncer.debounce(async move {
                let _ = tx.send(query);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(400)).await;
        drop(tx);
        drop(debouncer);

        assert_eq!(rx.recv().await, Some("London"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.debounce(async move {
            let _ = tx.send(());
        });
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        debouncer.debounce(async move {
            let _ = tx.send(());
        });
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        // Sender was dropped with the aborted task.
        assert_eq!(rx.recv().await, None);
    }
}
