//! Multimap: one key, any number of values.
//!
//! Values under a key keep their insertion order; duplicate `(key, value)`
//! pairs are allowed. A key whose last value is removed disappears from
//! [`MultiMap::keys`].
//!
//! Keys are hashed with a fixed-seed FNV hasher, so enumeration order depends
//! only on the map's contents and history, never on per-process random state.
//!
//! # Events
//!
//! * `on_add` receives the key after every [`MultiMap::add`].
//! * `on_remove` receives the key after a removal that removed at least one value.

use std::hash::Hash;

use fnv::FnvBuildHasher;

use crate::config::CollectionConfig;
use crate::data_structures::events::{ChangeNotifier, EventChannel};

/// Distinct keys of a [`MultiMap`].
pub type KeySet<K> = hashbrown::HashSet<K, FnvBuildHasher>;

type Buckets<K, V> = hashbrown::HashMap<K, Vec<V>, FnvBuildHasher>;

/// An observable key-to-many-values map.
///
/// # Type Parameters
///
/// * `K` - Key type.
/// * `V` - Value type. `PartialEq` decides which value [`MultiMap::remove_first`]
///   and [`MultiMap::contains_pair`] match.
#[derive(Debug)]
pub struct MultiMap<K, V> {
    buckets: Buckets<K, V>,
    len: usize,
    events: ChangeNotifier<K, K>,
}

impl<K, V> MultiMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    /// Creates an empty multimap with default configuration.
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Creates an empty multimap with the specified configuration.
    ///
    /// `initial_capacity` is the number of distinct keys reserved.
    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            buckets: Buckets::with_capacity_and_hasher(
                config.initial_capacity,
                FnvBuildHasher::default(),
            ),
            len: 0,
            events: ChangeNotifier::new(config.broadcast),
        }
    }

    /// Associates one more `value` with `key`.
    pub fn add(&mut self, key: K, value: V) {
        let event = self.events.emits_added().then(|| key.clone());
        self.buckets.entry(key).or_default().push(value);
        self.len += 1;
        tracing::trace!(len = self.len, "multimap add");
        if let Some(event) = event {
            self.events.notify_added(|| event);
        }
    }

    /// Number of values associated with `key`.
    pub fn count_for_key(&self, key: &K) -> usize {
        self.buckets.get(key).map_or(0, Vec::len)
    }

    /// Copies of every value under `key`, in insertion order.
    pub fn find_all(&self, key: &K) -> Vec<V> {
        self.buckets.get(key).cloned().unwrap_or_default()
    }

    /// Removes `key` and all of its values.
    ///
    /// # Returns
    ///
    /// How many values were removed.
    pub fn remove_all(&mut self, key: &K) -> usize {
        let Some((key, values)) = self.buckets.remove_entry(key) else {
            return 0;
        };
        let removed = values.len();
        self.len -= removed;
        tracing::trace!(removed, len = self.len, "multimap remove all");
        self.events.notify_removed(|| key);
        removed
    }

    /// Removes the first value under `key` equal to `value`, keeping the others.
    ///
    /// # Returns
    ///
    /// `1` if a value was removed, `0` otherwise.
    pub fn remove_first(&mut self, key: &K, value: &V) -> usize {
        let Some(values) = self.buckets.get_mut(key) else {
            return 0;
        };
        let Some(index) = values.iter().position(|existing| existing == value) else {
            return 0;
        };

        values.remove(index);
        if values.is_empty() {
            self.buckets.remove(key);
        }
        self.len -= 1;
        self.events.notify_removed(|| key.clone());
        1
    }

    /// The distinct keys.
    pub fn keys(&self) -> KeySet<K> {
        self.buckets.keys().cloned().collect()
    }

    /// Whether `key` has a value equal to `value`.
    pub fn contains_pair(&self, key: &K, value: &V) -> bool {
        self.buckets
            .get(key)
            .is_some_and(|values| values.contains(value))
    }

    /// Every value, grouped by key.
    ///
    /// Keys are walked once; each key's values are appended in insertion
    /// order. Two calls without an intervening mutation return the same order.
    pub fn all_values(&self) -> Vec<V> {
        let mut values = Vec::with_capacity(self.len);
        for bucket in self.buckets.values() {
            values.extend(bucket.iter().cloned());
        }
        values
    }

    /// Borrowed `(key, values)` groups in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.buckets
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    /// Removes everything and reserves room for `reserve_capacity` keys.
    ///
    /// No per-key remove events are emitted.
    pub fn clear(&mut self, reserve_capacity: usize) {
        let removed = self.len;
        self.buckets =
            Buckets::with_capacity_and_hasher(reserve_capacity, FnvBuildHasher::default());
        self.len = 0;
        tracing::debug!(removed, reserve_capacity, "multimap cleared");
    }

    /// Total number of `(key, value)` associations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no associations.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Channel notified with the key after each add.
    pub fn on_add(&self) -> &EventChannel<K> {
        self.events.added()
    }

    /// Channel notified with the key after each removal.
    pub fn on_remove(&self) -> &EventChannel<K> {
        self.events.removed()
    }

    /// Enables or disables change events for this instance.
    pub fn set_broadcast(&mut self, broadcast: bool) {
        self.events.set_broadcast(broadcast);
    }
}

impl<K, V> Default for MultiMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_keep_insertion_order_per_key() {
        let mut map = MultiMap::new();
        map.add("k", 3);
        map.add("k", 1);
        map.add("k", 2);
        assert_eq!(map.find_all(&"k"), vec![3, 1, 2]);
        assert_eq!(map.count_for_key(&"k"), 3);
        assert_eq!(map.key_count(), 1);
    }

    #[test]
    fn test_remove_first_removes_one_duplicate() {
        let mut map = MultiMap::new();
        map.add("k", 7);
        map.add("k", 7);
        assert_eq!(map.remove_first(&"k", &7), 1);
        assert_eq!(map.find_all(&"k"), vec![7]);
        assert_eq!(map.remove_first(&"k", &8), 0);
        assert_eq!(map.remove_first(&"missing", &7), 0);
    }

    #[test]
    fn test_empty_bucket_drops_key() {
        let mut map = MultiMap::new();
        map.add("k", 1);
        assert_eq!(map.remove_first(&"k", &1), 1);
        assert!(map.keys().is_empty());
        assert!(map.is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut map = MultiMap::new();
        map.add("a", 1);
        map.add("a", 2);
        map.add("b", 3);
        assert_eq!(map.remove_all(&"a"), 2);
        assert_eq!(map.remove_all(&"a"), 0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.all_values(), vec![3]);
    }

    #[test]
    fn test_all_values_is_deterministic() {
        let mut map = MultiMap::new();
        for key in 0..50 {
            map.add(key, key * 10);
            map.add(key, key * 10 + 1);
        }
        let first = map.all_values();
        assert_eq!(first.len(), 100);
        assert_eq!(first, map.all_values());
    }
}
