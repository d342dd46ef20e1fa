//! Errors raised while layering and validating [`ContainersConfig`].
//!
//! [`ContainersConfig`]: crate::config::ContainersConfig

use std::path::PathBuf;
use thiserror::Error;

/// Configuration failures, from locating the file to checking each section.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("No configuration file at {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file extension names no format the loader understands.
    #[error("Unsupported configuration format for {} (expected .toml, .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Defaults, file and `PREFIX__SECTION__KEY` overrides could not be merged
    /// into a [`ContainersConfig`](crate::config::ContainersConfig).
    #[error("Cannot merge defaults, file and environment overrides: {0}")]
    ParseError(String),

    /// A section holds an inconsistent value.
    #[error("Invalid container settings: {0}")]
    ValidationError(String),

    /// A numeric setting falls outside its accepted bounds.
    #[error("Setting {key} = {value} is out of range, {message}")]
    ValueOutOfRange {
        /// Dotted path of the setting
        key: String,
        /// Value that was rejected
        value: usize,
        /// Accepted bounds
        message: String,
    },
}
