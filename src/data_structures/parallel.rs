//! Worker pool for bulk data-parallel iteration.
//!
//! Parallel iteration borrows a [`WorkerPool`] for one call: work is fanned out
//! across the pool's threads and joined before the call returns. The pool owns
//! no long-running tasks of its own.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::ParallelConfig;
use crate::error::ContainersResult;

/// A fixed-size pool of worker threads.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
    min_chunk_len: usize,
}

impl WorkerPool {
    /// Builds a pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ContainersError::WorkerPool`] if the threads
    /// cannot be spawned.
    pub fn new(config: &ParallelConfig) -> ContainersResult<Self> {
        let prefix = config.thread_name_prefix.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()?;

        tracing::debug!(
            worker_threads = config.worker_threads,
            min_chunk_len = config.min_chunk_len,
            "Worker pool started"
        );

        Ok(Self {
            pool,
            min_chunk_len: config.min_chunk_len.max(1),
        })
    }

    /// Number of worker threads.
    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Smallest number of elements handed to a single task.
    pub fn min_chunk_len(&self) -> usize {
        self.min_chunk_len
    }

    /// Runs `op` inside the pool and waits for it to finish.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_pool_uses_configured_threads() {
        let pool = WorkerPool::new(&ParallelConfig::new().with_worker_threads(3)).unwrap();
        assert_eq!(pool.worker_threads(), 3);
        assert_eq!(pool.install(rayon::current_num_threads), 3);
    }

    #[test]
    fn test_install_runs_parallel_work() {
        let pool = WorkerPool::new(&ParallelConfig::new().with_worker_threads(2)).unwrap();
        let sum: u64 = pool.install(|| (1..=100u64).into_par_iter().sum());
        assert_eq!(sum, 5050);
    }
}
