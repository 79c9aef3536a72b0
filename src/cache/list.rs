//! List LRU Module
//!
//! Ordered-list recency tracking: the simple, easily verified eviction strategy.

use std::collections::VecDeque;

use crate::cache::EvictionPolicy;

// == List LRU ==
/// Tracks access order in a VecDeque where:
/// - Front = Least recently used
/// - Back = Most recently used
///
/// Every access is O(n); fine for the small bounds memoization uses.
#[derive(Debug)]
pub struct ListLru<K> {
    /// Order of keys by access time
    order: VecDeque<K>,
}

impl<K: PartialEq + Clone> ListLru<K> {
    // == Constructor ==
    /// Creates a new empty list tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Moves `key` to the back (most recent), adding it if absent.
    pub fn touch(&mut self, key: &K) {
        match self.position(key) {
            Some(index) => {
                if let Some(existing) = self.order.remove(index) {
                    self.order.push_back(existing);
                }
            }
            None => self.order.push_back(key.clone()),
        }
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.front()
    }

    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }
}

impl<K: PartialEq + Clone> Default for ListLru<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone> EvictionPolicy<K> for ListLru<K> {
    fn record_lookup(&mut self, key: &K, resident: bool) {
        // Absent keys join the list only once their value is stored
        if resident {
            self.touch(key);
        }
    }

    fn record_insert(&mut self, key: &K) {
        self.touch(key);
    }

    fn rollback(&mut self, key: &K) {
        self.remove(key);
    }

    fn remove(&mut self, key: &K) {
        if let Some(index) = self.position(key) {
            self.order.remove(index);
        }
    }

    fn pop_victim(&mut self) -> Option<K> {
        self.order.pop_front()
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(lru: &ListLru<&'static str>) -> Vec<&'static str> {
        lru.iter().copied().collect()
    }

    #[test]
    fn test_list_new() {
        let lru: ListLru<&str> = ListLru::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
    }

    #[test]
    fn test_insert_appends_to_back() {
        let mut lru = ListLru::new();

        lru.record_insert(&"key1");
        lru.record_insert(&"key2");
        lru.record_insert(&"key3");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(&"key1"));
        assert_eq!(keys(&lru), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_resident_lookup_moves_to_back() {
        let mut lru = ListLru::new();

        lru.record_insert(&"key1");
        lru.record_insert(&"key2");
        lru.record_insert(&"key3");

        lru.record_lookup(&"key1", true);

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(&"key2"));
    }

    #[test]
    fn test_absent_lookup_is_not_tracked() {
        let mut lru = ListLru::new();

        lru.record_lookup(&"ghost", false);
        assert!(lru.is_empty());

        // A failed miss leaves nothing behind
        lru.rollback(&"ghost");
        assert!(lru.is_empty());
    }

    #[test]
    fn test_pop_victim_order() {
        let mut lru = ListLru::new();

        lru.record_insert(&"a");
        lru.record_insert(&"b");
        lru.record_insert(&"c");
        lru.record_lookup(&"a", true);
        lru.record_lookup(&"c", true);
        lru.record_lookup(&"b", true);

        // touch(a): [b, c, a], touch(c): [b, a, c], touch(b): [a, c, b]
        assert_eq!(lru.pop_victim(), Some("a"));
        assert_eq!(lru.pop_victim(), Some("c"));
        assert_eq!(lru.pop_victim(), Some("b"));
        assert_eq!(lru.pop_victim(), None);
    }

    #[test]
    fn test_remove_from_middle() {
        let mut lru = ListLru::new();

        lru.record_insert(&"key1");
        lru.record_insert(&"key2");
        lru.record_insert(&"key3");

        lru.remove(&"key2");

        assert_eq!(keys(&lru), vec!["key1", "key3"]);
        assert!(!lru.contains(&"key2"));
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut lru = ListLru::new();

        lru.record_insert(&"key1");
        lru.record_insert(&"key2");
        lru.remove(&"nonexistent");

        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_touch_same_key_multiple_times() {
        let mut lru = ListLru::new();

        lru.record_insert(&"key1");
        lru.record_insert(&"key1");
        lru.record_lookup(&"key1", true);

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.pop_victim(), Some("key1"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut lru = ListLru::new();
        lru.record_insert(&"a");
        lru.record_insert(&"b");
        lru.clear();
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }
}
