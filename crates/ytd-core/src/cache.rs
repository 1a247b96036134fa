//! Bounded per-session cache of resolved metadata

use std::collections::VecDeque;

/// Least-recently-used cache keyed by URL.
///
/// Entries are never expired by time; they live until evicted by newer URLs,
/// invalidated explicitly, or the session ends. A capacity of 0 disables
/// caching entirely.
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    // Most recently used at the back
    entries: VecDeque<(String, V)>,
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos)?;
        let value = entry.1.clone();
        self.entries.push_back(entry);
        Some(value)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        self.invalidate(&key);
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, value));
    }

    /// Drop the entry for `key`; returns whether one existed
    pub fn invalidate(&mut self, key: &str) -> bool {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }
}
