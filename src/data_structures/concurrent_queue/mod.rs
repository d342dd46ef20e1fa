//! Lock-free FIFO queue with a single consumer.
//!
//! The queue is a singly linked list with a sentinel head. Producers append at
//! the tail; the one consumer detaches from the head. The producer mode is a
//! type parameter:
//!
//! * [`Mpsc`] - any number of producers, enqueue through `&self`.
//! * [`Spsc`] - one producer, enqueue through `&mut self`.
//!
//! The queue is unbounded: enqueue always succeeds.
//!
//! # Concurrency
//!
//! * **Append**: a producer builds its node completely, swaps it into `tail`
//!   with a CAS loop, then release-stores it into the previous tail's `next`.
//! * **Detach**: the consumer acquire-loads `head.next`, so every field of a
//!   node is visible before the node is observed.
//! * **Reclamation**: a node is freed only by the consumer, and only after its
//!   successor has been published, which is the last thing a producer does
//!   with it.
//!
//! Between a producer's tail swap and its `next` store the queue may briefly
//! appear shorter to the consumer than [`ConcurrentQueue::len`] reports. Items
//! from any one producer are always dequeued in the order it enqueued them.
//!
//! # Events
//!
//! * `on_enqueue` receives `true` after every enqueue.
//! * `on_dequeue` receives `true` after every dequeue or pop that removed an item.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use crate::config::QueueConfig;
use crate::data_structures::events::{ChangeNotifier, EventChannel};
use crate::error::{ContainerError, ContainerResult};

mod node;
use node::Node;

mod sealed {
    pub trait Sealed {}
}

/// Producer discipline of a [`ConcurrentQueue`].
///
/// Implemented only by [`Mpsc`] and [`Spsc`].
pub trait QueueMode: sealed::Sealed + Send + Sync + 'static {
    /// Human-readable mode name used in logs.
    const NAME: &'static str;
}

/// Multiple producers, single consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mpsc;

/// Single producer, single consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spsc;

impl sealed::Sealed for Mpsc {}
impl sealed::Sealed for Spsc {}

impl QueueMode for Mpsc {
    const NAME: &'static str = "mpsc";
}

impl QueueMode for Spsc {
    const NAME: &'static str = "spsc";
}

/// An observable lock-free FIFO queue.
///
/// # Type Parameters
///
/// * `T` - Type of items stored in the queue. Must be `Send + Sync`.
/// * `M` - Producer mode, [`Mpsc`] by default.
pub struct ConcurrentQueue<T: Send + Sync, M: QueueMode = Mpsc> {
    /// Sentinel node; only the consumer moves it
    head: AtomicPtr<Node<T>>,

    /// Most recently enqueued node
    tail: AtomicPtr<Node<T>>,

    /// Items enqueued and not yet dequeued
    len: AtomicUsize,

    events: ChangeNotifier<bool, bool>,

    _marker: PhantomData<(T, M)>,
}

impl<T: Send + Sync, M: QueueMode> ConcurrentQueue<T, M> {
    /// Creates an empty queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates an empty queue with the specified configuration.
    pub fn with_config(config: QueueConfig) -> Self {
        let sentinel = Node::alloc_sentinel();
        Self {
            head: AtomicPtr::new(sentinel),
            tail: AtomicPtr::new(sentinel),
            len: AtomicUsize::new(0),
            events: ChangeNotifier::new(config.broadcast),
            _marker: PhantomData,
        }
    }

    /// Removes and returns the oldest item, or `None` if the queue is empty.
    pub fn dequeue(&mut self) -> Option<T> {
        // SAFETY: `&mut self` makes this the only consumer.
        unsafe { self.take_front() }
    }

    /// Removes and returns the oldest item.
    ///
    /// # Errors
    ///
    /// [`ContainerError::Empty`] if there is nothing to dequeue.
    pub fn try_dequeue(&mut self) -> ContainerResult<T> {
        self.dequeue().ok_or(ContainerError::Empty)
    }

    /// Borrows the oldest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        // SAFETY: removal needs `&mut self`, which cannot coexist with the
        // returned borrow.
        unsafe { self.front() }
    }

    /// Discards the oldest item.
    ///
    /// # Returns
    ///
    /// `true` if an item was discarded.
    pub fn pop(&mut self) -> bool {
        self.dequeue().is_some()
    }

    /// Whether the consumer currently sees no item.
    pub fn is_empty(&self) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        // SAFETY: the head node is freed only by the consumer, which cannot run
        // while `&self` is borrowed outside of `split`.
        unsafe { (*head).next.load(Ordering::Acquire).is_null() }
    }

    /// Number of items enqueued and not yet dequeued.
    ///
    /// Advisory while producers are running.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Splits the queue into a producer handle and the consumer handle.
    ///
    /// Both handles borrow the queue, so they can be moved into scoped threads.
    pub fn split(&mut self) -> (Producer<'_, T, M>, Consumer<'_, T, M>) {
        let queue: &Self = self;
        (Producer { queue }, Consumer { queue })
    }

    /// Channel notified after each enqueue.
    pub fn on_enqueue(&self) -> &EventChannel<bool> {
        self.events.added()
    }

    /// Channel notified after each dequeue or pop.
    pub fn on_dequeue(&self) -> &EventChannel<bool> {
        self.events.removed()
    }

    /// Enables or disables change events for this instance.
    pub fn set_broadcast(&mut self, broadcast: bool) {
        self.events.set_broadcast(broadcast);
    }

    /// Appends a node, safe with any number of concurrent producers.
    fn push_shared(&self, value: T) {
        let node = Node::alloc(value);
        // Counted before publication so the consumer's decrement never underflows.
        self.len.fetch_add(1, Ordering::AcqRel);

        let mut prev = self.tail.load(Ordering::Acquire);
        loop {
            match self
                .tail
                .compare_exchange_weak(prev, node, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(current) => prev = current,
            }
        }

        // SAFETY: `prev` cannot be freed until its `next` is non-null, which
        // only this store makes true.
        unsafe { (*prev).next.store(node, Ordering::Release) };
        self.after_push();
    }

    /// Appends a node without a CAS.
    ///
    /// # Safety
    ///
    /// No other producer may run concurrently.
    unsafe fn push_exclusive(&self, value: T) {
        let node = Node::alloc(value);
        self.len.fetch_add(1, Ordering::AcqRel);

        let prev = self.tail.load(Ordering::Relaxed);
        self.tail.store(node, Ordering::Relaxed);
        // SAFETY: as in `push_shared`; the caller rules out other producers.
        unsafe { (*prev).next.store(node, Ordering::Release) };
        self.after_push();
    }

    fn after_push(&self) {
        tracing::trace!(mode = M::NAME, "queue enqueue");
        self.events.notify_added(|| true);
    }

    /// Borrows the value of the first live node.
    ///
    /// # Safety
    ///
    /// The caller must be the only consumer and must not detach the front node
    /// while the returned reference is alive.
    unsafe fn front(&self) -> Option<&T> {
        let head = self.head.load(Ordering::Relaxed);
        // SAFETY: only the consumer frees nodes, and the caller is the consumer.
        let next = unsafe { (*head).next.load(Ordering::Acquire) };
        if next.is_null() {
            return None;
        }
        // SAFETY: `next` was published with a release store and is not freed
        // until it has itself become the head and been passed.
        unsafe { (*next).peek() }
    }

    /// Detaches the first live node and returns its value.
    ///
    /// # Safety
    ///
    /// The caller must be the only consumer.
    unsafe fn take_front(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        // SAFETY: the caller is the only consumer, so `head` is alive.
        let next = unsafe { (*head).next.load(Ordering::Acquire) };
        if next.is_null() {
            return None;
        }

        self.head.store(next, Ordering::Relaxed);
        // SAFETY: `next` is the new sentinel; its value is read only here.
        let value = unsafe { (*next).take() };
        // SAFETY: `head.next` is set, so no producer will touch `head` again.
        drop(unsafe { Box::from_raw(head) });
        self.len.fetch_sub(1, Ordering::AcqRel);

        tracing::trace!(mode = M::NAME, "queue dequeue");
        self.events.notify_removed(|| true);
        value
    }
}

impl<T: Send + Sync> ConcurrentQueue<T, Mpsc> {
    /// Appends `value`. Callable from any number of threads at once.
    pub fn enqueue(&self, value: T) {
        self.push_shared(value);
    }
}

impl<T: Send + Sync> ConcurrentQueue<T, Spsc> {
    /// Appends `value`.
    pub fn enqueue(&mut self, value: T) {
        // SAFETY: `&mut self` rules out any other producer.
        unsafe { self.push_exclusive(value) }
    }
}

impl<T: Send + Sync, M: QueueMode> Default for ConcurrentQueue<T, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync, M: QueueMode> fmt::Debug for ConcurrentQueue<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentQueue")
            .field("mode", &M::NAME)
            .field("len", &self.len())
            .field("events", &self.events)
            .finish()
    }
}

impl<T: Send + Sync, M: QueueMode> Drop for ConcurrentQueue<T, M> {
    fn drop(&mut self) {
        let mut node = *self.head.get_mut();
        while !node.is_null() {
            // SAFETY: `&mut self` means no producer or consumer is running and
            // every node from the head onwards is still owned by the queue.
            let boxed = unsafe { Box::from_raw(node) };
            node = boxed.next.load(Ordering::Relaxed);
        }
    }
}

/// Enqueue handle obtained from [`ConcurrentQueue::split`].
///
/// `Producer<'_, T, Mpsc>` can be cloned and shared by many threads;
/// `Producer<'_, T, Spsc>` is unique.
pub struct Producer<'a, T: Send + Sync, M: QueueMode> {
    queue: &'a ConcurrentQueue<T, M>,
}

impl<T: Send + Sync> Producer<'_, T, Mpsc> {
    /// Appends `value`.
    pub fn enqueue(&self, value: T) {
        self.queue.push_shared(value);
    }
}

impl<T: Send + Sync> Producer<'_, T, Spsc> {
    /// Appends `value`.
    pub fn enqueue(&mut self, value: T) {
        // SAFETY: the Spsc producer is not `Clone` and enqueues through
        // `&mut self`, so it is the only producer.
        unsafe { self.queue.push_exclusive(value) }
    }
}

impl<T: Send + Sync> Clone for Producer<'_, T, Mpsc> {
    fn clone(&self) -> Self {
        Self { queue: self.queue }
    }
}

impl<T: Send + Sync, M: QueueMode> fmt::Debug for Producer<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("mode", &M::NAME).finish()
    }
}

/// Dequeue handle obtained from [`ConcurrentQueue::split`].
pub struct Consumer<'a, T: Send + Sync, M: QueueMode> {
    queue: &'a ConcurrentQueue<T, M>,
}

impl<T: Send + Sync, M: QueueMode> Consumer<'_, T, M> {
    /// Removes and returns the oldest item, or `None` if the queue is empty.
    pub fn dequeue(&mut self) -> Option<T> {
        // SAFETY: there is one `Consumer` per split and it dequeues through
        // `&mut self`.
        unsafe { self.queue.take_front() }
    }

    /// Removes and returns the oldest item.
    ///
    /// # Errors
    ///
    /// [`ContainerError::Empty`] if there is nothing to dequeue.
    pub fn try_dequeue(&mut self) -> ContainerResult<T> {
        self.dequeue().ok_or(ContainerError::Empty)
    }

    /// Borrows the oldest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        // SAFETY: detaching needs `&mut self`, which cannot coexist with the
        // returned borrow.
        unsafe { self.queue.front() }
    }

    /// Discards the oldest item.
    pub fn pop(&mut self) -> bool {
        self.dequeue().is_some()
    }

    /// Whether the consumer currently sees no item.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of items enqueued and not yet dequeued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl<T: Send + Sync, M: QueueMode> fmt::Debug for Consumer<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("mode", &M::NAME)
            .field("len", &self.queue.len())
            .finish()
    }
}
