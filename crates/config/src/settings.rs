// Grid settings
// Loaded from ~/.config/entrygrid/settings.toml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Settings parsed but are unusable.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "settings IO error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where exported CSV files are downloaded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// File name of the download.
    pub file_name: String,

    /// Target directory. None = the user's download directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "export.csv".to_string(),
            directory: None,
        }
    }
}

impl ExportSettings {
    /// Directory the download lands in: configured, else the platform
    /// download directory, else the working directory.
    pub fn effective_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Pacing of the simulated bulk import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Number of progress steps before the data lands.
    pub steps: u32,

    /// Delay per step, milliseconds.
    pub step_delay_ms: u64,

    /// Fixed seed for the synthetic data. None = random.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            steps: 10,
            step_delay_ms: 150,
            seed: None,
        }
    }
}

impl ImportSettings {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Period-over-period highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Minimum increase over the previous period, percent.
    pub threshold_percent: f64,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self { threshold_percent: 100.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub export: ExportSettings,
    pub import: ImportSettings,
    pub highlight: HighlightSettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("entrygrid");
        config_dir.join("settings.toml")
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{} ({}); using default settings", e, path.display());
                Self::default()
            }
        }
    }

    /// Load and validate settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("export.file_name must not be empty".into()));
        }
        if self.export.file_name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "export.file_name '{}' must be a bare file name",
                self.export.file_name
            )));
        }
        if self.import.steps == 0 {
            return Err(ConfigError::Invalid("import.steps must be at least 1".into()));
        }
        if !self.highlight.threshold_percent.is_finite() {
            return Err(ConfigError::Invalid("highlight.threshold_percent must be a number".into()));
        }
        Ok(())
    }

    /// Save current settings to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, text).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Save current settings to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }
}
