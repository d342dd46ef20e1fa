//! Small helpers shared by the containers and the CLI harness.

pub mod timer;

pub use timer::Stopwatch;
