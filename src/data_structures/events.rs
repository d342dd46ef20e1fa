//! Change notification shared by every container.
//!
//! Each container owns a [`ChangeNotifier`]: one [`EventChannel`] for "added"
//! and one for "removed". Observers are delivered to synchronously, on the
//! thread that performed the mutation, in registration order, after the
//! mutation has completed.
//!
//! Events are values owned by the channel for the duration of the emit call.
//! Observers receive `&E` to that copy and can never reach into the
//! container's storage.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Receives change events from an [`EventChannel`].
///
/// Any `Fn(&E) + Send + Sync` closure is an observer.
pub trait Observer<E>: Send + Sync {
    /// Called once per emitted event.
    fn notify(&self, event: &E);
}

impl<E, F> Observer<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn notify(&self, event: &E) {
        self(event)
    }
}

/// Handle returned by [`EventChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// An ordered list of observers for a single kind of event.
pub struct EventChannel<E> {
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn Observer<E>>)>>,
    next_id: AtomicU64,
}

impl<E> EventChannel<E> {
    /// Creates a channel with no observers.
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers an observer. It will be notified after every observer
    /// registered before it.
    pub fn subscribe<O>(&self, observer: O) -> SubscriptionId
    where
        O: Observer<E> + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, Arc::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        match observers.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to every observer in registration order.
    ///
    /// The observer list is snapshotted first, so observers may subscribe or
    /// unsubscribe from inside their callback; such changes apply from the next
    /// emit on.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Arc<dyn Observer<E>>> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in snapshot {
            observer.notify(event);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("observers", &self.len())
            .finish()
    }
}

/// The "added" and "removed" channels of one container instance.
#[derive(Debug)]
pub struct ChangeNotifier<A, R> {
    added: EventChannel<A>,
    removed: EventChannel<R>,
    broadcast: bool,
}

impl<A, R> ChangeNotifier<A, R> {
    /// Creates a notifier; with `broadcast == false` nothing is ever emitted.
    pub fn new(broadcast: bool) -> Self {
        Self {
            added: EventChannel::new(),
            removed: EventChannel::new(),
            broadcast,
        }
    }

    /// Channel for "item(s) added" events.
    pub fn added(&self) -> &EventChannel<A> {
        &self.added
    }

    /// Channel for "item(s) removed" events.
    pub fn removed(&self) -> &EventChannel<R> {
        &self.removed
    }

    /// Whether events are currently emitted.
    pub fn broadcast(&self) -> bool {
        self.broadcast
    }

    /// Enables or disables emission.
    pub fn set_broadcast(&mut self, broadcast: bool) {
        self.broadcast = broadcast;
    }

    /// Whether an "added" event would reach anyone right now.
    pub fn emits_added(&self) -> bool {
        self.broadcast && !self.added.is_empty()
    }

    /// Emits an "added" event. `event` only runs when someone will receive it.
    pub fn notify_added(&self, event: impl FnOnce() -> A) {
        if self.emits_added() {
            self.added.emit(&event());
        }
    }

    /// Emits a "removed" event. `event` only runs when someone will receive it.
    pub fn notify_removed(&self, event: impl FnOnce() -> R) {
        if self.broadcast && !self.removed.is_empty() {
            self.removed.emit(&event());
        }
    }
}

impl<A, R> Default for ChangeNotifier<A, R> {
    fn default() -> Self {
        Self::new(true)
    }
}
