use ::config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};
use crate::results::DEFAULT_MAX_RESULTS;

/// Configuration for a search.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.wordfinder.yaml` in the current directory
/// 3. Global `$HOME/.config/wordfinder/config.yaml`
///
/// # Configuration Format
///
/// ```yaml
/// # Worker threads used to scan rows and columns (default: CPU cores)
/// thread_count: 4
///
/// # How many ranked words to report
/// max_results: 10
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// When using the CLI, command-line arguments take precedence over config file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Number of threads to use for scanning
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Number of ranked words to report
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            thread_count: default_thread_count(),
            max_results: default_max_results(),
            log_level: default_log_level(),
        }
    }
}

/// Overrides supplied on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub thread_count: Option<NonZeroUsize>,
    pub max_results: Option<usize>,
    pub log_level: Option<String>,
}

impl FinderConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("wordfinder/config.yaml")),
            Some(PathBuf::from(".wordfinder.yaml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_layers(&defaults, config_path)
    }

    /// Layers `optional` files that exist, in order, then `explicit`, which
    /// must exist. Later layers win.
    pub fn load_layers(
        optional: &[PathBuf],
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        for path in optional {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if let Some(max_results) = cli.max_results {
            self.max_results = max_results;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Checks values serde cannot express
    pub fn validate(&self) -> SearchResult<()> {
        if self.max_results == 0 {
            return Err(SearchError::config_error("max_results must be at least 1"));
        }
        Ok(())
    }
}
