//! Configuration management for flowdeck.
//!
//! Loads configuration from ${FLOWDECK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for flowdeck configuration and data directories.
    //!
    //! FLOWDECK_HOME resolution order:
    //! 1. FLOWDECK_HOME environment variable (if set)
    //! 2. ~/.config/flowdeck (default)
    //! 3. ./.flowdeck when no home directory is known

    use std::path::PathBuf;

    /// Returns the flowdeck home directory.
    pub fn flowdeck_home() -> PathBuf {
        if let Ok(home) = std::env::var("FLOWDECK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".flowdeck"),
            |h| h.join(".config").join("flowdeck"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        flowdeck_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        flowdeck_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred modal width in columns (shrinks to fit the terminal)
    pub modal_width: usize,

    /// Entries visible at once in a selection list
    pub max_list_rows: usize,

    /// Visible text rows in the multi-line editor
    pub multiline_rows: usize,

    /// Give up waiting for a key after this many seconds (0 disables)
    pub read_timeout_secs: u64,

    /// Repaint interval of the status spinner
    pub spinner_interval_ms: u64,

    /// Log filter used when FLOWDECK_LOG is not set (e.g. "debug")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modal_width: Self::DEFAULT_MODAL_WIDTH,
            max_list_rows: Self::DEFAULT_MAX_LIST_ROWS,
            multiline_rows: Self::DEFAULT_MULTILINE_ROWS,
            read_timeout_secs: 0,
            spinner_interval_ms: Self::DEFAULT_SPINNER_INTERVAL_MS,
            log_level: None,
        }
    }
}

impl Config {
    const DEFAULT_MODAL_WIDTH: usize = 64;
    const DEFAULT_MAX_LIST_ROWS: usize = 12;
    const DEFAULT_MULTILINE_ROWS: usize = 8;
    const DEFAULT_SPINNER_INTERVAL_MS: u64 = 80;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents =
            toml::to_string(&Config::default()).context("Failed to serialize default config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Per-read key timeout, if enabled.
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }

    pub fn spinner_interval(&self) -> Duration {
        Duration::from_millis(self.spinner_interval_ms.max(10))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.read_timeout(), None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "modal_width = 50\nread_timeout_secs = 30\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.modal_width, 50);
        assert_eq!(config.max_list_rows, 12);
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "modal_width = \"wide\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();

        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_file_and_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::init(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let err = Config::init(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
