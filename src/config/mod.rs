//! Configuration module for the BA containers library.
//!
//! Settings are layered: compiled-in defaults, then an optional file (TOML,
//! YAML, JSON), then environment variables of the form
//! `PREFIX__SECTION__KEY`. The merged result is validated before use.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::config::ConfigError;
use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

pub mod collections;
pub mod parallel;

pub use collections::{CollectionConfig, QueueConfig};
pub use parallel::ParallelConfig;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default configuration location
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BA";

/// Initialize the process-wide configuration from the default location.
///
/// A missing file is not an error; see [`load_or_default`].
pub fn init_default_config() -> ConfigResult<()> {
    let config = load_or_default(Path::new(DEFAULT_CONFIG_PATH), ENV_PREFIX)?;
    init_global_config(config);
    Ok(())
}

/// Loads `path` over the defaults, or only the defaults and environment
/// overrides when `path` does not exist.
pub fn load_or_default(path: &Path, env_prefix: &str) -> ConfigResult<ContainersConfig> {
    match ConfigLoader::new(Some(path), env_prefix).load() {
        Err(ConfigError::FileNotFound(_)) => {
            tracing::warn!(
                "Configuration file not found at {}, using defaults",
                path.display()
            );
            ConfigLoader::new(None::<&Path>, env_prefix).load()
        }
        loaded => loaded,
    }
}

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Top-level configuration: one section per container plus the shared
/// parallel-iteration and logging sections.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContainersConfig {
    /// Dynamic array defaults
    pub array: CollectionConfig,

    /// Ordered hash map defaults
    pub map: CollectionConfig,

    /// Multimap defaults
    pub multi_map: CollectionConfig,

    /// Hash set defaults
    pub set: CollectionConfig,

    /// Concurrent queue defaults
    pub queue: QueueConfig,

    /// Worker pool used by parallel iteration
    pub parallel: ParallelConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl Validate for ContainersConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.array.validate()?;
        self.map.validate()?;
        self.multi_map.validate()?;
        self.set.validate()?;
        self.queue.validate()?;
        self.parallel.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from defaults, the file and environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(ContainersConfig)` if the configuration was loaded and validated
    /// * `Err(ConfigError)` if there was an error loading the configuration
    pub fn load(&self) -> ConfigResult<ContainersConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&ContainersConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => return Err(ConfigError::UnsupportedFormat(path.clone())),
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| match e {
            ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
            other => ConfigError::ParseError(other.to_string()),
        })?;

        let containers_config: ContainersConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        containers_config.validate()?;

        Ok(containers_config)
    }
}

/// Global configuration accessor.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    config: Arc<ContainersConfig>,
}

impl GlobalConfig {
    /// Creates a new global configuration.
    pub fn new(config: ContainersConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration.
    pub fn get(&self) -> &ContainersConfig {
        &self.config
    }
}

static GLOBAL_CONFIG: OnceCell<Mutex<GlobalConfig>> = OnceCell::new();

/// Initialize the global configuration. Later calls are ignored.
pub fn init_global_config(config: ContainersConfig) {
    if GLOBAL_CONFIG.set(Mutex::new(GlobalConfig::new(config))).is_err() {
        tracing::warn!("Global configuration was already initialized, ignoring new configuration");
    }
}

/// Get the global configuration, if it has been initialized.
pub fn global_config() -> Option<GlobalConfig> {
    let mutex = GLOBAL_CONFIG.get()?;

    let guard = mutex.lock().unwrap_or_else(|poisoned| {
        tracing::error!("Global config lock was poisoned, recovering");
        poisoned.into_inner()
    });

    Some(guard.clone())
}
