use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// One-shot, many-reader shutdown signal.
///
/// Cloning shares the underlying signal. Triggering is idempotent: only the
/// first `cancel()` performs the transition, every later or concurrent call
/// is a no-op. `cancelled()` resolves for every waiter, including waiters
/// that register after the transition.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    pub fn cancel(&self) {
        // swap guards the transition: wake waiters exactly once.
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        loop {
            if self.is_cancelled() {
                return;
            }
            // Register interest before re-checking the flag, otherwise a
            // cancel() landing between the check and the await is lost.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }
}
