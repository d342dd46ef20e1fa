//! BA Containers Library
//!
//! Observable generic containers: a dynamic array, an insertion-ordered hash
//! map, a multimap, a lock-free MPSC/SPSC queue and a hash set. Every
//! container notifies registered observers of additions and removals, and
//! the array and map can iterate in parallel on a borrowed worker pool.
//!
//! # Architecture
//!
//! - Containers are independent of each other and share only the
//!   [`data_structures::events`] mechanism
//! - Mutation goes through `&mut self`, except the queue's producers
//! - Configuration is layered (defaults, file, environment) and validated
//! - Recoverable conditions are typed errors, never panics

pub mod config;
pub mod data_structures;
pub mod demo;
pub mod error;
pub mod utils;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the BA containers library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Loads `config/default.toml` (if present) plus `BA__*` environment
/// overrides into the process-wide configuration.
pub fn init() -> error::ContainersResult<()> {
    config::init_default_config()?;
    Ok(())
}
