//! Per-container configuration.
//!
//! Every container reads its starting capacity and whether it broadcasts change
//! events from one of these sections.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest starting capacity accepted from configuration.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Configuration shared by the array, map, multimap and set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Number of slots reserved at construction time
    pub initial_capacity: usize,

    /// Whether mutations emit change events to registered observers
    pub broadcast: bool,
}

impl CollectionConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of slots reserved at construction time.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets whether mutations emit change events.
    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            broadcast: true,
        }
    }
}

impl Validate for CollectionConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::ValueOutOfRange {
                key: "initial_capacity".to_string(),
                value: self.initial_capacity,
                message: format!("must not exceed {MAX_INITIAL_CAPACITY}"),
            });
        }
        Ok(())
    }
}

/// Configuration for the concurrent queue.
///
/// The producer mode is part of the queue's type and therefore not configurable
/// at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Whether enqueue/dequeue emit change events to registered observers
    pub broadcast: bool,
}

impl QueueConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether enqueue/dequeue emit change events.
    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { broadcast: true }
    }
}

impl Validate for QueueConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}
