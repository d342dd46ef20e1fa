//! Insertion-ordered hash map with change notification.
//!
//! Each key maps to at most one value. Keys enumerate in insertion order
//! until [`HashMap::sort_by_key`] or [`HashMap::sort_by_value`] reorders them;
//! removal keeps the relative order of the remaining entries.
//!
//! [`HashMap::get`] returns `V::default()` for a missing key, so its result
//! cannot tell "absent" from "present with a default value". Use
//! [`HashMap::contains_key`], [`HashMap::find`] or [`HashMap::try_get`] when
//! absence matters.
//!
//! # Events
//!
//! * `on_add` receives a copy of every value added.
//! * `on_remove` receives a copy of every value removed by
//!   [`HashMap::remove_and_take`].

use std::cmp::Ordering;
use std::hash::Hash;
use std::time::Duration;

use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::config::CollectionConfig;
use crate::data_structures::events::{ChangeNotifier, EventChannel};
use crate::data_structures::parallel::WorkerPool;
use crate::error::{ContainerError, ContainerResult};
use crate::utils::Stopwatch;

type Entries<K, V> = IndexMap<K, V, FnvBuildHasher>;

/// An observable unique-key map that remembers entry order.
///
/// # Type Parameters
///
/// * `K` - Key type.
/// * `V` - Value type. `Default` supplies the result of a missed [`HashMap::get`].
#[derive(Debug)]
pub struct HashMap<K, V> {
    entries: Entries<K, V>,
    events: ChangeNotifier<V, V>,
}

impl<K, V> HashMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + Default,
{
    /// Creates an empty map with default configuration.
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Creates an empty map with the specified configuration.
    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            entries: Entries::with_capacity_and_hasher(
                config.initial_capacity,
                FnvBuildHasher::default(),
            ),
            events: ChangeNotifier::new(config.broadcast),
        }
    }

    /// Associates `value` with `key`.
    ///
    /// A new key goes to the end of the order; an existing key keeps its
    /// position and has its value replaced.
    ///
    /// # Returns
    ///
    /// The value previously stored under `key`, if any.
    pub fn add(&mut self, key: K, value: V) -> Option<V> {
        let event = self.events.emits_added().then(|| value.clone());
        let previous = self.entries.insert(key, value);
        tracing::trace!(len = self.entries.len(), replaced = previous.is_some(), "map add");
        if let Some(event) = event {
            self.events.notify_added(|| event);
        }
        previous
    }

    /// Removes `key` and hands back its value.
    ///
    /// # Returns
    ///
    /// `None` if `key` was absent.
    pub fn remove_and_take(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.shift_remove(key)?;
        tracing::trace!(len = self.entries.len(), "map remove");
        self.events.notify_removed(|| removed.clone());
        Some(removed)
    }

    /// Copy of the value under `key`, or `V::default()` if absent.
    pub fn get(&self, key: &K) -> V {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// The value under `key`, if present.
    pub fn find(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// The value under `key`.
    ///
    /// # Errors
    ///
    /// [`ContainerError::NotFound`] if `key` is absent.
    pub fn try_get(&self, key: &K) -> ContainerResult<&V> {
        self.entries.get(key).ok_or(ContainerError::NotFound)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// All keys in map order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    /// All values in map order.
    pub fn values(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }

    /// Borrowed `(key, value)` pairs in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// A new map holding copies of the entries matching `predicate`, in order.
    ///
    /// The result has no observers and broadcasting enabled.
    pub fn filter_by_predicate<P>(&self, mut predicate: P) -> HashMap<K, V>
    where
        P: FnMut(&K, &V) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter(|(key, value)| predicate(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        HashMap {
            entries,
            events: ChangeNotifier::default(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry and reserves room for `reserve_capacity` new ones.
    ///
    /// No per-value remove events are emitted.
    pub fn clear(&mut self, reserve_capacity: usize) {
        let removed = self.entries.len();
        self.entries =
            Entries::with_capacity_and_hasher(reserve_capacity, FnvBuildHasher::default());
        tracing::debug!(removed, reserve_capacity, "map cleared");
    }

    /// Reorders entries by value. Stable.
    pub fn sort_by_value<C>(&mut self, mut comparator: C)
    where
        C: FnMut(&V, &V) -> Ordering,
    {
        self.entries.sort_by(|_, a, _, b| comparator(a, b));
        tracing::debug!(len = self.entries.len(), "map sorted by value");
    }

    /// Reorders entries by key. Stable.
    pub fn sort_by_key<C>(&mut self, mut comparator: C)
    where
        C: FnMut(&K, &K) -> Ordering,
    {
        self.entries.sort_by(|a, _, b, _| comparator(a, b));
        tracing::debug!(len = self.entries.len(), "map sorted by key");
    }

    /// Visits every value in map order with mutable access.
    ///
    /// # Returns
    ///
    /// How long the pass took.
    pub fn for_each_value_mut<F>(&mut self, mut f: F) -> Duration
    where
        F: FnMut(&K, &mut V),
    {
        let watch = Stopwatch::start();
        for (key, value) in self.entries.iter_mut() {
            f(key, value);
        }
        watch.stop()
    }

    /// Visits every value with mutable access, spread across `pool`.
    ///
    /// Every key is assigned to exactly one worker. The key set cannot change
    /// during the pass since the map is exclusively borrowed.
    ///
    /// # Returns
    ///
    /// How long the pass took.
    pub fn par_for_each_value_mut<F>(&mut self, pool: &WorkerPool, f: F) -> Duration
    where
        K: Send + Sync,
        V: Send,
        F: Fn(&K, &mut V) + Send + Sync,
    {
        let watch = Stopwatch::start();
        let min_len = pool.min_chunk_len();
        let entries = &mut self.entries;
        pool.install(|| {
            entries
                .par_iter_mut()
                .with_min_len(min_len)
                .for_each(|(key, value)| f(key, value))
        });
        let elapsed = watch.stop();
        tracing::debug!(len = self.entries.len(), ?elapsed, "map parallel pass");
        elapsed
    }

    /// Channel notified with each added value.
    pub fn on_add(&self) -> &EventChannel<V> {
        self.events.added()
    }

    /// Channel notified with each removed value.
    pub fn on_remove(&self) -> &EventChannel<V> {
        self.events.removed()
    }

    /// Enables or disables change events for this instance.
    pub fn set_broadcast(&mut self, broadcast: bool) {
        self.events.set_broadcast(broadcast);
    }
}

impl<K, V> Default for HashMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
