//! FIFO Tracker Module
//!
//! Arena of cache entries threaded onto a doubly-linked list in insertion order.

use std::sync::Arc;

use crate::cache::CacheEntry;
use crate::models::Order;

// == FIFO Tracker ==
/// Owns every cache entry and their insertion order.
///
/// Entries live in a dense slot vector; vacated slots are recycled through a
/// free list. The list runs from `head` (oldest) to `tail` (newest), so both
/// appending and evicting are O(1) without moving any other entry.
#[derive(Debug, Default)]
pub struct FifoTracker {
    /// Slot storage, `None` for vacated slots
    slots: Vec<Option<CacheEntry>>,
    /// Vacated slot indices ready for reuse
    free: Vec<usize>,
    /// Oldest entry
    head: Option<usize>,
    /// Newest entry
    tail: Option<usize>,
    /// Number of live entries
    len: usize,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates an empty tracker with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Back ==
    /// Appends a new entry as the newest and returns its slot.
    pub fn push_back(&mut self, key: String, value: Arc<Order>) -> usize {
        let mut entry = CacheEntry::new(key, value);
        entry.prev = self.tail;

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(old_tail) = self.slots[tail].as_mut() {
                    old_tail.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
        slot
    }

    // == Pop Front ==
    /// Removes and returns the oldest entry.
    ///
    /// Returns None if the tracker is empty.
    pub fn pop_front(&mut self) -> Option<CacheEntry> {
        let slot = self.head?;
        let entry = self.slots[slot].take()?;

        self.head = entry.next;
        match entry.next {
            Some(next) => {
                if let Some(new_head) = self.slots[next].as_mut() {
                    new_head.prev = None;
                }
            }
            None => self.tail = None,
        }
        self.free.push(slot);
        self.len -= 1;
        Some(entry)
    }

    // == Slot Access ==
    /// Returns the live entry at `slot`.
    pub fn get(&self, slot: usize) -> Option<&CacheEntry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Returns the live entry at `slot` for in-place replacement.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut CacheEntry> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    // == Peek Oldest ==
    /// Returns the key that would be evicted next.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.head
            .and_then(|slot| self.get(slot))
            .map(|entry| entry.key.as_str())
    }

    // == Keys ==
    /// Returns all keys from oldest to newest.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            match self.get(slot) {
                Some(entry) => {
                    keys.push(entry.key.clone());
                    cursor = entry.next;
                }
                None => break,
            }
        }
        keys
    }

    // == Length ==
    /// Returns the number of live entries.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
