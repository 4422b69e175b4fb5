//! Bounded Cache Module
//!
//! Thread-safe handle around [`CacheStore`]. One lock guards both the key index
//! and the FIFO order, so the relative order of concurrent `set` calls is the
//! order in which they acquire it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, SetOutcome};
use crate::models::Order;

// == Bounded Cache ==
/// Fixed-capacity, FIFO-evicting order cache shared across tasks.
#[derive(Debug)]
pub struct BoundedCache {
    store: RwLock<CacheStore>,
    capacity: usize,
}

impl BoundedCache {
    /// Creates an empty cache holding at most `capacity` orders.
    pub fn new(capacity: usize) -> Self {
        let store = CacheStore::new(capacity);
        let capacity = store.capacity();
        Self {
            store: RwLock::new(store),
            capacity,
        }
    }

    // == Get ==
    /// Looks up an order. Absence is not an error.
    pub async fn get(&self, key: &str) -> Option<Arc<Order>> {
        // Write lock: hit/miss counters live inside the store
        let found = self.store.write().await.get(key);
        match &found {
            Some(_) => debug!(key, "cache hit"),
            None => debug!(key, "cache miss"),
        }
        found
    }

    /// Looks up an order without counting a hit or miss.
    pub async fn peek(&self, key: &str) -> Option<Arc<Order>> {
        self.store.read().await.peek(key)
    }

    // == Set ==
    /// Inserts or replaces an order, evicting the oldest entry when full.
    pub async fn set(&self, key: impl Into<String>, order: Arc<Order>) {
        let key = key.into();
        let outcome = self.store.write().await.set(key.clone(), order);
        match outcome {
            SetOutcome::Inserted => debug!(key = %key, "cache set"),
            SetOutcome::Updated => debug!(key = %key, "cache update"),
            SetOutcome::Evicted(evicted) => {
                debug!(key = %key, evicted = %evicted, "cache set, evicted oldest")
            }
        }
    }

    // == Introspection ==
    /// Returns cached keys from oldest to newest.
    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BoundedCache {
    fn default() -> Self {
        Self::new(crate::cache::DEFAULT_CAPACITY)
    }
}
