//! Command-line configuration.
//!
//! Settings live in a TOML file under the platform config directory and
//! can be overridden from the command line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fishwatch_core::{SchedulerConfig, DEFAULT_CATALOG_PATH};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "fishwatch.toml";

/// Front-end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Catalog file (JSON or RON)
    pub catalog_path: PathBuf,
    /// Clock polling interval in watch mode (milliseconds)
    pub poll_interval_ms: u64,
    /// Start with Fish Eyes on
    pub fish_eyes: bool,
    /// Windows printed per fish
    pub report_windows: usize,
    /// Scheduler tuning
    pub scheduler: SchedulerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            poll_interval_ms: 2500,
            fish_eyes: false,
            report_windows: 3,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };
        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("fishwatch").join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.clamp(100, 60_000);
        self.report_windows = self.report_windows.clamp(1, 20);
        self.scheduler.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.catalog_path, PathBuf::from("data/catalog.json"));
        assert_eq!(config.poll_interval_ms, 2500);
        assert!(!config.fish_eyes);
        assert_eq!(config.scheduler.max_windows, 10);
    }

    #[test]
    fn test_config_validation() {
        let mut config = CliConfig {
            poll_interval_ms: 5,
            report_windows: 0,
            ..CliConfig::default()
        };
        config.scheduler.max_windows = 500;
        config.validate();

        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.report_windows, 1);
        assert_eq!(config.scheduler.max_windows, 100);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("fishwatch.toml");

        let config = CliConfig {
            fish_eyes: true,
            report_windows: 5,
            scheduler: SchedulerConfig {
                match_limit: 500,
                ..SchedulerConfig::default()
            },
            ..CliConfig::default()
        };
        config.save_to(&config_path).unwrap();

        let loaded = CliConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("fishwatch.toml");
        fs::write(&config_path, "fish_eyes = true\n[scheduler]\nmax_windows = 4\n").unwrap();

        let loaded = CliConfig::load_from(&config_path);
        assert!(loaded.fish_eyes);
        assert_eq!(loaded.scheduler.max_windows, 4);
        assert_eq!(loaded.scheduler.match_limit, 10_000);
        assert_eq!(loaded.poll_interval_ms, 2500);
    }

    #[test]
    fn test_load_missing_or_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert_eq!(CliConfig::load_from(&missing), CliConfig::default());

        let invalid = temp_dir.path().join("invalid.toml");
        fs::write(&invalid, "poll_interval_ms = \"soon\"").unwrap();
        assert_eq!(CliConfig::load_from(&invalid), CliConfig::default());
    }
}
