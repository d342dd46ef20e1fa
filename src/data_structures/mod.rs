//! Observable generic containers.
//!
//! Five independent containers share one change-notification mechanism
//! ([`events`]) and, where they iterate in parallel, one [`WorkerPool`]:
//!
//! - [`DynamicArray`]: ordered, indexable sequence
//! - [`HashMap`]: unique keys, insertion ordered, sortable by key or value
//! - [`MultiMap`]: any number of values per key
//! - [`ConcurrentQueue`]: lock-free FIFO with one consumer
//! - [`HashSet`]: unique values
//!
//! All containers except the queue mutate through `&mut self`.

pub mod concurrent_queue;
pub mod dynamic_array;
pub mod events;
pub mod hash_map;
pub mod hash_set;
pub mod multi_map;
pub mod parallel;
pub mod record;

// Re-export common data structures
pub use concurrent_queue::{ConcurrentQueue, Consumer, Mpsc, Producer, QueueMode, Spsc};
pub use dynamic_array::DynamicArray;
pub use events::{ChangeNotifier, EventChannel, Observer, SubscriptionId};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use multi_map::{KeySet, MultiMap};
pub use parallel::WorkerPool;
pub use record::{KeyedRecord, Record, RecordFields, RecordSorting};
