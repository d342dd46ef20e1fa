//! Linked-list node for the concurrent queue.
//!
//! The queue always holds one sentinel node at its head. A node's value is
//! written once by its producer before the node is published and is read or
//! taken only by the single consumer.

use std::cell::UnsafeCell;
use std::ptr;
use std::sync::atomic::AtomicPtr;

/// A node in the concurrent queue.
///
/// # Type Parameters
///
/// * `T` - Type of the value stored in the node.
#[derive(Debug)]
pub(crate) struct Node<T> {
    /// The stored value; `None` for the sentinel and after it has been taken
    value: UnsafeCell<Option<T>>,

    /// The node enqueued after this one, null while this node is the tail
    pub(crate) next: AtomicPtr<Node<T>>,
}

impl<T> Node<T> {
    /// Allocates a node holding `value` and leaks it as a raw pointer.
    pub(crate) fn alloc(value: T) -> *mut Self {
        Box::into_raw(Box::new(Self {
            value: UnsafeCell::new(Some(value)),
            next: AtomicPtr::new(ptr::null_mut()),
        }))
    }

    /// Allocates an empty sentinel node and leaks it as a raw pointer.
    pub(crate) fn alloc_sentinel() -> *mut Self {
        Box::into_raw(Box::new(Self {
            value: UnsafeCell::new(None),
            next: AtomicPtr::new(ptr::null_mut()),
        }))
    }

    /// Borrows the stored value.
    ///
    /// # Safety
    ///
    /// The caller must be the queue's only consumer, and no [`Node::take`] on
    /// this node may happen while the returned reference is alive.
    pub(crate) unsafe fn peek(&self) -> Option<&T> {
        // SAFETY: producers never touch `value` after publication and the
        // caller guarantees no concurrent `take`.
        unsafe { (*self.value.get()).as_ref() }
    }

    /// Moves the stored value out, leaving `None`.
    ///
    /// # Safety
    ///
    /// The caller must be the queue's only consumer and must hold no
    /// reference obtained from [`Node::peek`] on this node.
    pub(crate) unsafe fn take(&self) -> Option<T> {
        // SAFETY: exclusive access to `value` is guaranteed by the caller.
        unsafe { (*self.value.get()).take() }
    }
}
