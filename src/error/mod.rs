//! Error module for the BA containers library.
//!
//! Absence and boundary conditions on the containers themselves (a missing key,
//! an index past the end, an empty queue) are ordinary results and are modelled
//! by [`ContainerError`]. Everything around the containers (configuration,
//! worker pool construction, I/O in the CLI) funnels into [`ContainersError`].

use thiserror::Error;

pub mod config;
pub mod container;

pub use container::{ContainerError, ContainerResult};

/// Result type alias used throughout the library.
pub type ContainersResult<T> = Result<T, ContainersError>;

/// Core error enum for the library and the CLI harness.
#[derive(Error, Debug)]
pub enum ContainersError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A container operation was rejected (out of range, not found, empty).
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// The worker pool for parallel iteration could not be built.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}
