/*!
 * Application configuration.
 *
 * Loading, validating and saving the settings. Core functions take their
 * thresholds as plain parameters; only the binary reads configuration,
 * through a [`ConfigRepository`].
 */

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::service::AnalysisConfig;
use crate::errors::ConfigError;
use crate::split::SplitConfig;
use crate::translation::TranslationConfig;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Readability thresholds and analyzed track
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Split defaults
    #[serde(default)]
    pub split: SplitConfig,

    /// Translation pass settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Apply the local text fix to every segment right after loading
    #[serde(default)]
    pub auto_fix_on_upload: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if !(analysis.safe_max > 0.0 && analysis.safe_max < analysis.warning_max) {
            return Err(ConfigError::InvalidThresholds {
                safe_max: analysis.safe_max,
                warning_max: analysis.warning_max,
            });
        }
        if analysis.max_line_chars == 0 || analysis.max_lines == 0 {
            return Err(ConfigError::InvalidValue(
                "analysis line limits must be at least 1".to_string(),
            ));
        }

        if !(self.split.duration_minutes.is_finite() && self.split.duration_minutes > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "split.duration_minutes must be positive, got {}",
                self.split.duration_minutes
            )));
        }
        if self.split.count_per_file == 0 {
            return Err(ConfigError::InvalidValue(
                "split.count_per_file must be at least 1".to_string(),
            ));
        }

        self.translation.validate()
    }
}

/// Where configuration is loaded from and saved to
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config, ConfigError>;
    fn save(&self, config: &Config) -> Result<(), ConfigError>;
}

/// Configuration stored as pretty JSON in a file
#[derive(Debug, Clone)]
pub struct JsonFileConfigRepository {
    path: PathBuf,
}

impl JsonFileConfigRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<config dir>/subkit/conf.json`, falling back to `./conf.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("subkit").join("conf.json"))
            .unwrap_or_else(|| PathBuf::from("conf.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl Default for JsonFileConfigRepository {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl ConfigRepository for JsonFileConfigRepository {
    /// A missing file yields the default configuration
    fn load(&self) -> Result<Config, ConfigError> {
        if !self.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::Io(format!("{}: {}", parent.display(), e)))?;
            }
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| ConfigError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

/// Configuration held in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryConfigRepository {
    config: RwLock<Option<Config>>,
}

impl MemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }
}

impl ConfigRepository for MemoryConfigRepository {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.config.read().clone().unwrap_or_default())
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        *self.config.write() = Some(config.clone());
        Ok(())
    }
}
