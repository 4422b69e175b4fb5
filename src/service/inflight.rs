//! In-flight request registry
//!
//! Collapses concurrent requests for the same key into one execution. The first
//! caller for a key registers a shared pending handle and runs the fetch; every
//! caller that finds the handle already registered awaits its result instead.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

type Pending<T> = Arc<OnceCell<T>>;

/// Per-key registry of pending fetches.
#[derive(Debug)]
pub struct InflightRegistry<T> {
    // Never held across an await
    pending: Mutex<HashMap<String, Pending<T>>>,
}

impl<T> Default for InflightRegistry<T> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send + Sync> InflightRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Pending<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `fetch` for `key` unless a fetch for the same key is already
    /// pending, in which case its result is shared.
    ///
    /// The handle is unregistered in the same step that produces its value, so
    /// a handle holding a value is never visible to later callers, even if the
    /// caller that ran `fetch` is dropped right after. If that caller is
    /// dropped before finishing, one of the waiters takes over.
    pub async fn run<F, Fut>(&self, key: &str, fetch: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let handle = Arc::clone(self.lock().entry(key.to_string()).or_default());

        let value = handle
            .get_or_init(|| async {
                let value = fetch().await;
                self.unregister(key, &handle);
                value
            })
            .await;
        value.clone()
    }

    fn unregister(&self, key: &str, handle: &Pending<T>) {
        let mut pending = self.lock();
        if pending
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, handle))
        {
            pending.remove(key);
        }
    }

    /// Number of keys with a pending fetch.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
