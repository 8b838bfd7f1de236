//! Work Tracker: an outstanding-work counter with quiescence notification.
//!
//! The crawl is quiescent when the tracker's count reaches zero: every URL
//! that was ever handed out by the frontier has either been fetched, parsed,
//! and had its children enqueued, or has failed and been accounted for. The
//! orchestrator awaits [`WorkTracker::wait_until_done`] to know when to stop
//! feeding workers.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

/// Shared, cloneable handle to the outstanding-work count.
#[derive(Clone)]
pub struct WorkTracker {
    inner: Arc<Inner>,
}

struct Inner {
    count: Mutex<i64>,
    notify: Notify,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                count: Mutex::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Record `n` new units of outstanding work (e.g. `n` URLs just added to
    /// the frontier).
    pub async fn add(&self, n: i64) {
        if n == 0 {
            return;
        }
        let mut count = self.inner.count.lock().await;
        *count += n;
    }

    /// Record that `n` units of outstanding work have completed. Wakes any
    /// waiter once the count reaches zero.
    pub async fn done(&self, n: i64) {
        if n == 0 {
            return;
        }
        let mut count = self.inner.count.lock().await;
        *count -= n;
        assert!(*count >= 0, "work tracker count went negative");
        if *count == 0 {
            self.inner.notify.notify_waiters();
        }
    }

    /// Current outstanding-work count.
    pub async fn count(&self) -> i64 {
        *self.inner.count.lock().await
    }

    /// Block until the outstanding-work count reaches zero. If the count is
    /// already zero this returns immediately.
    pub async fn wait_until_done(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if *self.inner.count.lock().await == 0 {
                return;
            }
            notified.await;
            if *self.inner.count.lock().await == 0 {
                return;
            }
        }
    }
}

impl Default for WorkTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn starts_at_zero_and_returns_immediately() {
        let tracker = WorkTracker::new();
        assert_eq!(tracker.count().await, 0);
        tokio::time::timeout(Duration::from_millis(50), tracker.wait_until_done())
            .await
            .expect("should not block when count is already zero");
    }

    #[tokio::test]
    async fn add_then_done_balances_to_zero() {
        let tracker = WorkTracker::new();
        tracker.add(3).await;
        assert_eq!(tracker.count().await, 3);
        tracker.done(1).await;
        tracker.done(2).await;
        assert_eq!(tracker.count().await, 0);
    }

    #[tokio::test]
    async fn wait_until_done_unblocks_when_last_unit_completes() {
        let tracker = WorkTracker::new();
        tracker.add(1).await;

        let waiter = tracker.clone();
        let handle = tokio::spawn(async move {
            waiter.wait_until_done().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tracker.done(1).await;

        tokio::time::timeout(Duration::from_millis(200), handle)
            .await
            .expect("waiter should unblock")
            .expect("task should not panic");
    }

    #[tokio::test]
    #[should_panic(expected = "work tracker count went negative")]
    async fn done_past_zero_panics() {
        let tracker = WorkTracker::new();
        tracker.done(1).await;
    }
}
