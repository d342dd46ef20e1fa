//! Dynamic array with change notification.
//!
//! An ordered, indexable, growable sequence. Order is insertion order until
//! [`DynamicArray::sort`] is called. Equality-based operations
//! ([`DynamicArray::contains`], [`DynamicArray::add_unique`],
//! [`DynamicArray::remove_first`]) use the element's `PartialEq` and scan
//! linearly; callers needing set semantics at scale should use
//! [`crate::data_structures::HashSet`].
//!
//! # Events
//!
//! * `on_add` receives `true` after every successful insertion.
//! * `on_remove` receives `true` after every removal that removed something.

use std::cmp::Ordering;
use std::time::Duration;

use rayon::prelude::*;

use crate::config::CollectionConfig;
use crate::data_structures::events::{ChangeNotifier, EventChannel};
use crate::data_structures::parallel::WorkerPool;
use crate::error::{ContainerError, ContainerResult};
use crate::utils::Stopwatch;

/// An observable, ordered, resizable sequence.
///
/// # Type Parameters
///
/// * `T` - Element type. `PartialEq` defines element equality.
#[derive(Debug)]
pub struct DynamicArray<T> {
    items: Vec<T>,
    events: ChangeNotifier<bool, bool>,
}

impl<T> DynamicArray<T>
where
    T: Clone + PartialEq,
{
    /// Creates an empty array with default configuration.
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Creates an empty array with the specified configuration.
    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            items: Vec::with_capacity(config.initial_capacity),
            events: ChangeNotifier::new(config.broadcast),
        }
    }

    /// Appends a value.
    pub fn add(&mut self, value: T) {
        self.items.push(value);
        tracing::trace!(len = self.items.len(), "array add");
        self.events.notify_added(|| true);
    }

    /// Appends a value unless an equal one is already present.
    ///
    /// This scans the whole array.
    ///
    /// # Returns
    ///
    /// `true` if the value was appended.
    pub fn add_unique(&mut self, value: T) -> bool {
        if self.items.contains(&value) {
            return false;
        }
        self.add(value);
        true
    }

    /// Moves the caller's value into the array, leaving `T::default()` behind.
    pub fn move_append(&mut self, value: &mut T)
    where
        T: Default,
    {
        self.add(std::mem::take(value));
    }

    /// Inserts a value at `index`, shifting later elements right.
    ///
    /// `index == len()` appends.
    ///
    /// # Errors
    ///
    /// [`ContainerError::OutOfRange`] if `index > len()`; the array is unchanged.
    pub fn insert_at(&mut self, value: T, index: usize) -> ContainerResult<()> {
        let len = self.items.len();
        if index > len {
            return Err(ContainerError::OutOfRange { index, len });
        }
        self.items.insert(index, value);
        tracing::trace!(index, "array insert");
        self.events.notify_added(|| true);
        Ok(())
    }

    /// Removes the first element equal to `value`.
    ///
    /// # Returns
    ///
    /// `true` if an element was removed.
    pub fn remove_first(&mut self, value: &T) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(index) => {
                self.items.remove(index);
                self.events.notify_removed(|| true);
                true
            }
            None => false,
        }
    }

    /// Removes the element at `index`.
    ///
    /// # Returns
    ///
    /// `false`, without touching the array, if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.try_remove_at(index).is_ok()
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn try_remove_at(&mut self, index: usize) -> ContainerResult<T> {
        let len = self.items.len();
        if index >= len {
            return Err(ContainerError::OutOfRange { index, len });
        }
        let removed = self.items.remove(index);
        self.events.notify_removed(|| true);
        Ok(removed)
    }

    /// Removes every element matching `predicate`, keeping the order of the rest.
    ///
    /// # Returns
    ///
    /// The number of removed elements.
    pub fn remove_matching<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        let removed = before - self.items.len();
        if removed > 0 {
            tracing::trace!(removed, "array remove matching");
            self.events.notify_removed(|| true);
        }
        removed
    }

    /// Removes and returns the first element, or `None` if empty.
    ///
    /// This shifts every remaining element; a queue suits FIFO access better.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let value = self.items.remove(0);
        self.events.notify_removed(|| true);
        Some(value)
    }

    /// Removes every element and reserves room for `reserve_capacity` new ones.
    pub fn clear(&mut self, reserve_capacity: usize) {
        let removed = self.items.len();
        self.items = Vec::with_capacity(reserve_capacity);
        tracing::debug!(removed, reserve_capacity, "array cleared");
        if removed > 0 {
            self.events.notify_removed(|| true);
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocated slots.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Whether an element equal to `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Copies of all elements in order.
    pub fn values(&self) -> Vec<T> {
        self.items.clone()
    }

    /// Borrowed view of all elements in order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Copies of the elements matching `predicate`, in order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Sorts in place. The sort is stable: equal elements keep their order.
    pub fn sort<C>(&mut self, comparator: C)
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(comparator);
        tracing::debug!(len = self.items.len(), "array sorted");
    }

    /// Visits every element in order with mutable access.
    ///
    /// # Returns
    ///
    /// How long the pass took.
    pub fn for_each_mut<F>(&mut self, f: F) -> Duration
    where
        F: FnMut(&mut T),
    {
        let watch = Stopwatch::start();
        self.items.iter_mut().for_each(f);
        watch.stop()
    }

    /// Visits every element with mutable access, spread across `pool`.
    ///
    /// Each index is handed to exactly one worker and no element moves during
    /// the pass. State shared between invocations of `f` beyond the element
    /// itself must be synchronised by the caller.
    ///
    /// # Returns
    ///
    /// How long the pass took.
    pub fn par_for_each_mut<F>(&mut self, pool: &WorkerPool, f: F) -> Duration
    where
        T: Send,
        F: Fn(&mut T) + Send + Sync,
    {
        let watch = Stopwatch::start();
        let min_len = pool.min_chunk_len();
        let items = &mut self.items;
        pool.install(|| items.par_iter_mut().with_min_len(min_len).for_each(f));
        let elapsed = watch.stop();
        tracing::debug!(len = self.items.len(), ?elapsed, "array parallel pass");
        elapsed
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

impl<T> Default for DynamicArray<T>
where
    T: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for DynamicArray<T>
where
    T: Clone + PartialEq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            events: ChangeNotifier::default(),
        }
    }
}
