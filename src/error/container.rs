//! Container operation errors.
//!
//! None of these are faults: they describe why a checked operation had nothing
//! to act on. The unchecked counterparts (`remove_at`, `dequeue`, `get`, ...)
//! report the same conditions through `bool`, `Option` or a default value.

use thiserror::Error;

/// Result type for checked container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Reasons a checked container operation could not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// An index was outside the current bounds.
    #[error("Index {index} is out of range for length {len}")]
    OutOfRange {
        /// The offending index
        index: usize,
        /// The container length at the time of the call
        len: usize,
    },

    /// The requested key or value is not present.
    #[error("Requested entry was not found")]
    NotFound,

    /// The queue had no item to hand out.
    #[error("Queue is empty")]
    Empty,
}
