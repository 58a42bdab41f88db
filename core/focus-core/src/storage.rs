//! Storage configuration and path management for Focus Sentinel.
//!
//! `StorageConfig` is the single place that decides where data lives:
//!
//! ```text
//! ~/.focus-sentinel/
//! ├── config.toml      monitor settings (optional)
//! ├── sessions.json    session log (SessionStore)
//! └── logs/            rolling CLI logs
//! ```
//!
//! Tests use [`StorageConfig::with_root`] to point everything at a temp directory.

use std::path::{Path, PathBuf};

use crate::error::{FocusError, Result};

const ROOT_DIR_NAME: &str = ".focus-sentinel";

/// Central configuration for all Focus Sentinel storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all data (default: ~/.focus-sentinel)
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the default root under the user's home directory.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(FocusError::HomeDirNotFound)?;
        Ok(Self {
            root: home.join(ROOT_DIR_NAME),
        })
    }

    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to sessions.json (completed session log).
    pub fn sessions_file(&self) -> PathBuf {
        self.root.join("sessions.json")
    }

    /// Path to config.toml (monitor settings).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to logs/ directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root_paths() {
        let config = StorageConfig::with_root(PathBuf::from("/tmp/focus-test"));
        assert_eq!(config.root(), Path::new("/tmp/focus-test"));
        assert_eq!(
            config.sessions_file(),
            PathBuf::from("/tmp/focus-test/sessions.json")
        );
        assert_eq!(
            config.config_file(),
            PathBuf::from("/tmp/focus-test/config.toml")
        );
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/focus-test/logs"));
    }

    #[test]
    fn test_from_home_uses_dot_directory() {
        if let Ok(config) = StorageConfig::from_home() {
            assert!(config.root().ends_with(ROOT_DIR_NAME));
        }
    }
}
