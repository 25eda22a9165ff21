//! Cooperative stop flag and signal handling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Shared "stop requested" flag
///
/// The crawl loop reads it between visits; anything holding a clone may set
/// it. A plain stop lets the in-flight visit finish. An abort also abandons
/// the in-flight fetch, leaving its entry pending.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
    aborted: Arc<AtomicBool>,
    changed: Arc<Notify>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the crawl loop to halt before its next visit
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.changed.notify_waiters();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Stops the crawl loop and abandons the fetch in progress
    pub fn request_abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.request_stop();
    }

    pub fn is_abort_requested(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Resolves once a stop has been requested
    pub async fn stopped(&self) {
        self.wait_until(|| self.is_stop_requested()).await
    }

    /// Resolves once an abort has been requested
    pub async fn aborted(&self) {
        self.wait_until(|| self.is_abort_requested()).await
    }

    async fn wait_until(&self, done: impl Fn() -> bool) {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            // Registered before the check so a concurrent request cannot be missed
            notified.as_mut().enable();

            if done() {
                return;
            }
            notified.await;
        }
    }
}

/// Spawns a task that requests a stop on Ctrl+C or SIGTERM
///
/// A second Ctrl+C abandons the fetch in progress. The crawl loop still
/// returns normally, so the queue is persisted either way.
pub fn spawn_signal_listener(handle: StopHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::warn!("Shutdown requested, finishing the current visit");
        handle.request_stop();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt received, abandoning the current visit");
            handle.request_abort();
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_clones_share_flag() {
        let handle = StopHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_stop_requested());

        clone.request_stop();
        assert!(handle.is_stop_requested());
    }

    #[test]
    fn test_request_is_idempotent() {
        let handle = StopHandle::new();
        handle.request_stop();
        handle.request_stop();
        assert!(handle.is_stop_requested());
    }

    #[test]
    fn test_stop_is_not_an_abort() {
        let handle = StopHandle::new();
        handle.request_stop();
        assert!(!handle.is_abort_requested());

        handle.request_abort();
        assert!(handle.is_stop_requested());
        assert!(handle.is_abort_requested());
    }

    #[tokio::test]
    async fn test_aborted_wakes_waiting_task() {
        let handle = StopHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.aborted().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());

        handle.request_abort();
        timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake on abort")
            .unwrap();
    }

    #[tokio::test]
    async fn test_aborted_resolves_after_the_fact() {
        let handle = StopHandle::new();
        handle.request_abort();
        assert!(timeout(Duration::from_secs(1), handle.aborted()).await.is_ok());
    }

    #[tokio::test]
    async fn test_stopped_wakes_on_stop_and_abort() {
        let handle = StopHandle::new();
        assert!(timeout(Duration::from_millis(20), handle.stopped()).await.is_err());

        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.stopped().await });
        handle.request_stop();
        assert!(timeout(Duration::from_secs(1), task).await.is_ok());

        let aborting = StopHandle::new();
        aborting.request_abort();
        assert!(timeout(Duration::from_secs(1), aborting.stopped()).await.is_ok());
    }

    #[tokio::test]
    async fn test_plain_stop_does_not_resolve_aborted() {
        let handle = StopHandle::new();
        handle.request_stop();
        assert!(timeout(Duration::from_millis(50), handle.aborted()).await.is_err());
    }
}
