//! Cache Entry Module
//!
//! Defines a single arena slot: the cached order plus its links in FIFO order.

use std::sync::Arc;

use crate::models::Order;

// == Cache Entry ==
/// A cached order together with its neighbours in insertion order.
///
/// `prev` points towards the oldest entry, `next` towards the newest. Links are
/// slot indices into the owning [`FifoTracker`](super::FifoTracker) and are only
/// meaningful while the entry is live.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key the entry was inserted under
    pub key: String,
    /// Shared, read-only order
    pub value: Arc<Order>,
    /// Older neighbour
    pub prev: Option<usize>,
    /// Newer neighbour
    pub next: Option<usize>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: String, value: Arc<Order>) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    /// Replaces the stored order, returning the previous one.
    pub fn replace(&mut self, value: Arc<Order>) -> Arc<Order> {
        std::mem::replace(&mut self.value, value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_is_unlinked() {
        let entry = CacheEntry::new("b1".to_string(), Arc::new(Order::default()));

        assert_eq!(entry.key, "b1");
        assert!(entry.prev.is_none());
        assert!(entry.next.is_none());
    }

    #[test]
    fn test_entry_replace_returns_old_value() {
        let first = Arc::new(Order {
            track_number: "TRK001".to_string(),
            ..Order::default()
        });
        let second = Arc::new(Order {
            track_number: "TRK002".to_string(),
            ..Order::default()
        });
        let mut entry = CacheEntry::new("b1".to_string(), first.clone());

        let old = entry.replace(second.clone());

        assert!(Arc::ptr_eq(&old, &first));
        assert!(Arc::ptr_eq(&entry.value, &second));
    }
}
