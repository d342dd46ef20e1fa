//! BA Containers - command-line harness.
//!
//! Loads configuration, initializes logging and drives the containers through
//! the scripted demo scenarios.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ba_containers_lib::config::{self, ConfigLoader, ContainersConfig, LogConfig};
use ba_containers_lib::data_structures::WorkerPool;
use ba_containers_lib::demo::{self, ContainerKind};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the BA containers harness.
#[derive(Parser, Debug)]
#[clap(name = "BA Containers", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser, global = true)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run a demo scenario against one container
    Demo {
        /// Container to exercise
        #[clap(long, value_enum)]
        container: ContainerKind,

        /// Number of records to generate
        #[clap(long, default_value_t = 10_000)]
        size: usize,

        /// Print the report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so that reports on stdout stay machine-readable.
fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(log.source_location)
        .with_line_number(log.source_location)
        .with_thread_names(true)
        .with_writer(std::io::stderr);

    let installed = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };
    installed.context("Failed to set global tracing subscriber")
}

/// Loads the configuration into the process-wide slot and returns it.
///
/// Without `--config`, `config/default.toml` is read when present.
fn load_config(path: Option<&Path>) -> Result<ContainersConfig> {
    match path {
        Some(path) => {
            let loaded = ConfigLoader::new(Some(path), config::ENV_PREFIX)
                .load()
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            config::init_global_config(loaded);
        }
        None => ba_containers_lib::init().context("Failed to load default configuration")?,
    }

    config::global_config()
        .map(|global| global.get().clone())
        .context("Global configuration was not initialized")
}

/// Main entry point for the application.
fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref());

    // Fall back to default log settings so configuration errors get reported.
    let log = loaded
        .as_ref()
        .map(|config| config.log.clone())
        .unwrap_or_default();
    init_logging(&log)?;

    match args.command {
        Command::Demo {
            container,
            size,
            json,
        } => {
            let config = loaded?;
            let pool = WorkerPool::new(&config.parallel).context("Failed to start worker pool")?;
            let report = demo::run(container, size, &config, &pool)
                .with_context(|| format!("Demo scenario for {container} failed"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
            Ok(())
        }
        Command::Validate => {
            info!("Validating configuration");
            loaded.context("Configuration validation failed")?;
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = ContainersConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .context("Failed to serialize default configuration")?;
            std::fs::write(&output, toml)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
