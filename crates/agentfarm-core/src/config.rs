//! Configuration loading and typed config structures for the Agent Farm.
//!
//! The configuration lives in `agentfarm-config.yaml`. Every field has a
//! default, so an empty or missing file yields a working farm. Only the
//! season length affects the running simulation; the remaining farm fields
//! shape a freshly generated state and are ignored once a save exists.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "agentfarm-config.yaml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "AGENTFARM_CONFIG";

/// Environment variable overriding `persistence.state_path`.
pub const STATE_PATH_ENV: &str = "AGENTFARM_STATE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but makes no sense.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `agentfarm-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FarmConfig {
    /// Simulation and fresh-farm parameters.
    #[serde(default)]
    pub farm: FarmSection,

    /// Renderer toggles copied into the farm settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Save file location and policy.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Host adapter timing.
    #[serde(default)]
    pub host: HostConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FarmConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `AGENTFARM_STATE_PATH` overrides `persistence.state_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Same as [`FarmConfig::from_file`] for a file that exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(STATE_PATH_ENV) {
            self.persistence.state_path = PathBuf::from(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.farm.season_length_days == 0 {
            return Err(ConfigError::Invalid {
                reason: "farm.season_length_days must be at least 1".to_owned(),
            });
        }
        if self.farm.width < MIN_FARM_SIZE || self.farm.height < MIN_FARM_SIZE {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "farm dimensions must be at least {MIN_FARM_SIZE}x{MIN_FARM_SIZE}"
                ),
            });
        }
        if self.host.pump_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "host.pump_interval_ms must be positive".to_owned(),
            });
        }
        Ok(())
    }
}

/// Smallest grid that still fits the barn, tilled block, and path row.
pub const MIN_FARM_SIZE: u32 = 7;

/// Simulation and fresh-farm parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FarmSection {
    /// Days per season.
    #[serde(default = "default_season_length_days")]
    pub season_length_days: u32,

    /// Seed balance of a fresh farm.
    #[serde(default = "default_starting_seeds")]
    pub starting_seeds: u64,

    /// Grid columns of a fresh farm.
    #[serde(default = "default_farm_size")]
    pub width: u32,

    /// Grid rows of a fresh farm.
    #[serde(default = "default_farm_size")]
    pub height: u32,

    /// Seed for the engine RNG. Random when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for FarmSection {
    fn default() -> Self {
        Self {
            season_length_days: default_season_length_days(),
            starting_seeds: default_starting_seeds(),
            width: default_farm_size(),
            height: default_farm_size(),
            rng_seed: None,
        }
    }
}

/// Renderer toggles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Day/night overlay.
    #[serde(default = "default_true")]
    pub day_night_cycle: bool,

    /// Particle effects.
    #[serde(default = "default_true")]
    pub particles: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            day_night_cycle: true,
            particles: true,
        }
    }
}

/// Save file location and policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the JSON state document.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Write the state after every mutation.
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            autosave: true,
        }
    }
}

/// Host adapter timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// How often deferred tasks and season rotation are checked.
    #[serde(default = "default_pump_interval_ms")]
    pub pump_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            pump_interval_ms: default_pump_interval_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_season_length_days() -> u32 {
    7
}

const fn default_starting_seeds() -> u64 {
    25
}

const fn default_farm_size() -> u32 {
    8
}

const fn default_true() -> bool {
    true
}

fn default_state_path() -> PathBuf {
    PathBuf::from("agentfarm-state.json")
}

const fn default_pump_interval_ms() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
