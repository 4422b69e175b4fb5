//! Cache Store Module
//!
//! Main cache engine combining a key index with FIFO-ordered slot storage.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheStats, FifoTracker};
use crate::models::Order;

// == Set Outcome ==
/// What a `set` did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// New key appended as newest
    Inserted,
    /// Existing key's value replaced, position kept
    Updated,
    /// New key appended after evicting the oldest key
    Evicted(String),
}

// == Cache Store ==
/// Fixed-capacity order storage with FIFO eviction.
///
/// Not synchronised; [`BoundedCache`](super::BoundedCache) wraps it in a lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to slot index
    index: HashMap<String, usize>,
    /// Entries in insertion order
    fifo: FifoTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` orders.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity),
            fifo: FifoTracker::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Set ==
    /// Stores an order under `key`.
    ///
    /// If the key already exists its value is replaced and its position in the
    /// eviction order is left untouched. Otherwise, if the store is full, the
    /// oldest inserted entry is evicted first. Any key is accepted.
    pub fn set(&mut self, key: String, value: Arc<Order>) -> SetOutcome {
        // Overwrite in place
        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.fifo.get_mut(slot) {
                entry.replace(value);
                self.stats.record_update();
                return SetOutcome::Updated;
            }
        }

        let mut outcome = SetOutcome::Inserted;
        if self.index.len() >= self.capacity {
            if let Some(evicted) = self.fifo.pop_front() {
                self.index.remove(&evicted.key);
                self.stats.record_eviction();
                outcome = SetOutcome::Evicted(evicted.key);
            }
        }

        let slot = self.fifo.push_back(key.clone(), value);
        self.index.insert(key, slot);
        self.stats.set_total_entries(self.index.len());

        outcome
    }

    // == Get ==
    /// Retrieves the order stored under `key`, recording a hit or miss.
    ///
    /// Never changes eviction order.
    pub fn get(&mut self, key: &str) -> Option<Arc<Order>> {
        let found = self.peek(key);
        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    // == Peek ==
    /// Retrieves an order without touching statistics.
    pub fn peek(&self, key: &str) -> Option<Arc<Order>> {
        self.index
            .get(key)
            .and_then(|&slot| self.fifo.get(slot))
            .map(|entry| Arc::clone(&entry.value))
    }

    // == Contains ==
    /// Checks for a key without touching statistics.
    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Returns cached keys from oldest to newest.
    pub fn keys(&self) -> Vec<String> {
        self.fifo.keys()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
