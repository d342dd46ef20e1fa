//! Hash set with change notification.
//!
//! Holds each value at most once, as decided by the value's `Hash` and `Eq`.
//! Iteration order is unspecified but fixed for a given history; sorting
//! produces a separate `Vec` and never reorders the set itself.
//!
//! # Events
//!
//! * `on_add` receives `true` after a value was actually inserted.
//! * `on_remove` receives `true` after a value was actually removed.

use std::cmp::Ordering;
use std::hash::Hash;

use fnv::FnvBuildHasher;

use crate::config::CollectionConfig;
use crate::data_structures::events::{ChangeNotifier, EventChannel};

type Members<T> = hashbrown::HashSet<T, FnvBuildHasher>;

/// An observable set of unique values.
#[derive(Debug)]
pub struct HashSet<T> {
    members: Members<T>,
    events: ChangeNotifier<bool, bool>,
}

impl<T> HashSet<T>
where
    T: Hash + Eq + Clone,
{
    /// Creates an empty set with default configuration.
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Creates an empty set with the specified configuration.
    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            members: Members::with_capacity_and_hasher(
                config.initial_capacity,
                FnvBuildHasher::default(),
            ),
            events: ChangeNotifier::new(config.broadcast),
        }
    }

    /// Inserts `value` unless an equal value is already present.
    ///
    /// # Returns
    ///
    /// `true` if the value was inserted. A duplicate emits no event.
    pub fn add(&mut self, value: T) -> bool {
        if !self.members.insert(value) {
            return false;
        }
        tracing::trace!(len = self.members.len(), "set add");
        self.events.notify_added(|| true);
        true
    }

    /// Removes the value equal to `value`.
    ///
    /// # Returns
    ///
    /// `true` if a value was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        if !self.members.remove(value) {
            return false;
        }
        tracing::trace!(len = self.members.len(), "set remove");
        self.events.notify_removed(|| true);
        true
    }

    /// Whether a value equal to `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.members.contains(value)
    }

    /// Removes every value and reserves room for `reserve_capacity` new ones.
    pub fn clear(&mut self, reserve_capacity: usize) {
        let removed = self.members.len();
        self.members =
            Members::with_capacity_and_hasher(reserve_capacity, FnvBuildHasher::default());
        tracing::debug!(removed, reserve_capacity, "set cleared");
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Borrowed values in set order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter()
    }

    /// Copies of all values in set order.
    pub fn to_vec(&self) -> Vec<T> {
        self.members.iter().cloned().collect()
    }

    /// Copies of the values matching `predicate`, in set order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.members
            .iter()
            .filter(|value| predicate(value))
            .cloned()
            .collect()
    }

    /// Copies of all values ordered by `comparator`.
    pub fn sort<C>(&self, mut comparator: C) -> Vec<T>
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        let mut sorted = self.to_vec();
        sorted.sort_by(|a, b| comparator(a, b));
        tracing::debug!(len = sorted.len(), "set sorted");
        sorted
    }

    /// Channel notified after insertions.
    pub fn on_add(&self) -> &EventChannel<bool> {
        self.events.added()
    }

    /// Channel notified after removals.
    pub fn on_remove(&self) -> &EventChannel<bool> {
        self.events.removed()
    }

    /// Enables or disables change events for this instance.
    pub fn set_broadcast(&mut self, broadcast: bool) {
        self.events.set_broadcast(broadcast);
    }
}

impl<T> Default for HashSet<T>
where
    T: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for HashSet<T>
where
    T: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.members.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut set = HashSet::new();
        assert!(set.add(3));
        assert!(!set.add(3));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        assert!(!set.contains(&2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sort_leaves_set_untouched() {
        let set: HashSet<i32> = [5, 1, 4, 2].into_iter().collect();
        let before = set.to_vec();
        assert_eq!(set.sort(|a, b| a.cmp(b)), vec![1, 2, 4, 5]);
        assert_eq!(set.sort(|a, b| b.cmp(a)), vec![5, 4, 2, 1]);
        assert_eq!(set.to_vec(), before);
    }

    #[test]
    fn test_clear() {
        let mut set: HashSet<i32> = (0..20).collect();
        set.clear(8);
        assert!(set.is_empty());
        assert!(set.add(1));
    }
}
