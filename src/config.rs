//! Application configuration management.
//!
//! Settings are merged from several layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (platform config dir `config.toml`, or `--config FILE`)
//! 3. `DUPSCAN_*` environment variables (e.g. `DUPSCAN_ALGORITHM=sha256`)
//! 4. Command-line flags
//!
//! # Example `config.toml`
//!
//! ```toml
//! algorithm = "sha256"
//! format = "json"
//! block_size = 65536
//! skip_hidden = true
//! min_size = 1024
//! progress = false
//! ```

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::output::ReportFormat;
use crate::scanner::{HashAlgorithm, WalkerConfig, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "DUPSCAN_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Read block size for hashing, in bytes.
    pub block_size: usize,
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Report format.
    pub format: ReportFormat,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Skip zero-byte files.
    pub skip_empty: bool,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Minimum file size to consider, in bytes.
    pub min_size: Option<u64>,
    /// Show progress bars.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            algorithm: HashAlgorithm::default(),
            format: ReportFormat::default(),
            skip_hidden: false,
            skip_empty: false,
            follow_symlinks: false,
            min_size: None,
            progress: true,
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A config file given with `--config` does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

impl Config {
    /// Load configuration from the default file (if any) and the environment.
    ///
    /// With `explicit` set, that file is used instead of the default one.
    /// A missing default file is not an error. A file that fails to parse is
    /// logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` names a missing file.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        let config = match Self::figment(file.as_deref()).extract::<Self>() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid configuration: {}", e);
                Self::figment(None).extract().unwrap_or_default()
            }
        };

        Ok(config.validated())
    }

    /// The figment used by [`Config::load`]: defaults, then `file`, then env.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupscan").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Apply command-line flags on top of this configuration.
    ///
    /// Flags only switch options on; a flag left out keeps the configured value.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(block_size) = cli.block_size {
            self.block_size = usize::try_from(block_size).unwrap_or(usize::MAX);
        }
        if cli.min_size.is_some() {
            self.min_size = cli.min_size;
        }
        self.skip_hidden |= cli.skip_hidden;
        self.skip_empty |= cli.skip_empty;
        self.follow_symlinks |= cli.follow_symlinks;
        if cli.no_progress || cli.quiet {
            self.progress = false;
        }
        self.validated()
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            skip_hidden: self.skip_hidden,
            skip_empty: self.skip_empty,
            min_size: self.min_size,
        }
    }

    fn validated(mut self) -> Self {
        if self.block_size == 0 {
            log::warn!(
                "block_size must be at least 1 byte, using {}",
                DEFAULT_BLOCK_SIZE
            );
            self.block_size = DEFAULT_BLOCK_SIZE;
        } else if self.block_size > MAX_BLOCK_SIZE {
            log::warn!(
                "block_size {} exceeds the maximum, using {}",
                self.block_size,
                MAX_BLOCK_SIZE
            );
            self.block_size = MAX_BLOCK_SIZE;
        }
        self
    }
}
