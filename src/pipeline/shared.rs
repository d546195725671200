use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tokio::sync::Mutex;

/// Cloneable handle letting a pool of stages compete for one input stream.
///
/// Each `recv` locks the underlying receiver for the duration of that one
/// receive, so items are handed to whichever pool member asks first and are
/// never duplicated. Dropping a `recv` future mid-wait releases the lock.
pub struct SharedReceiver<T> {
    inner: Arc<Mutex<Receiver<T>>>,
}

impl<T> Clone for SharedReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> SharedReceiver<T> {
    pub fn new(receiver: Receiver<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(receiver)),
        }
    }

    pub async fn recv(&self) -> Option<T> {
        self.inner.lock().await.recv().await
    }
}
