//! Chain handle shared between concurrent callers.
//!
//! Every transaction holds the lock for its whole orchestrated sequence, so
//! concurrent calls observe each other only as complete commits.

use std::sync::Arc;
use tokio::sync::Mutex;
use wblt_domain::ports::Chain;

/// Cloneable handle to one chain behind an async mutex.
#[derive(Debug)]
pub struct SharedChain<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedChain<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Chain> SharedChain<C> {
    /// Wraps `chain`.
    pub fn new(chain: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chain)),
        }
    }

    /// Runs a mutating call with exclusive access.
    pub async fn transact<T>(&self, op: impl FnOnce(&mut C) -> T) -> T {
        let mut guard = self.inner.lock().await;
        op(&mut *guard)
    }

    /// Runs a read-only call; waits for any transaction in flight.
    pub async fn read<T>(&self, op: impl FnOnce(&C) -> T) -> T {
        let guard = self.inner.lock().await;
        op(&*guard)
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> C {
        self.inner.lock().await.clone()
    }
}
