//! Parallel iteration configuration.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound on worker threads accepted from configuration.
const MAX_WORKER_THREADS: usize = 512;

/// Configuration of the worker pool borrowed by parallel iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Number of worker threads
    pub worker_threads: usize,

    /// Smallest number of elements handed to a single worker task
    pub min_chunk_len: usize,

    /// Prefix for worker thread names
    pub thread_name_prefix: String,
}

impl ParallelConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of worker threads.
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    /// Sets the smallest number of elements per worker task.
    pub fn with_min_chunk_len(mut self, min_chunk_len: usize) -> Self {
        self.min_chunk_len = min_chunk_len;
        self
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            min_chunk_len: 64,
            thread_name_prefix: "ba-worker".to_string(),
        }
    }
}

impl Validate for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.worker_threads == 0 || self.worker_threads > MAX_WORKER_THREADS {
            return Err(ConfigError::ValueOutOfRange {
                key: "parallel.worker_threads".to_string(),
                value: self.worker_threads,
                message: format!("must be between 1 and {MAX_WORKER_THREADS}"),
            });
        }

        if self.min_chunk_len == 0 {
            return Err(ConfigError::ValidationError(
                "min_chunk_len must be greater than 0".to_string(),
            ));
        }

        if self.thread_name_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
