//! Crate-level test suites.
//!
//! One suite per container plus configuration, errors and events. Inline
//! `#[cfg(test)]` modules next to each container cover the basics; these
//! suites cover observer behaviour, the sorting matrix and property-based
//! checks. Shared strategies and fixtures live in [`test_utils`].

pub mod concurrent_queue_tests;
pub mod events_tests;
pub mod hash_map_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{
    keyed_record_strategy, record_strategy, records_strategy, EventCounter, TestFixture,
};
