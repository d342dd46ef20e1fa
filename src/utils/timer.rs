//! Wall-clock timing for iteration passes.

use std::time::{Duration, Instant};

/// Measures how long a bulk operation took.
///
/// Serial and parallel iteration report their elapsed time through this so the
/// two variants can be compared by callers.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Starts a new measurement.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time since [`Stopwatch::start`] without consuming the stopwatch.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Ends the measurement.
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}
