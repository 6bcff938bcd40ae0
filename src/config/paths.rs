//! Path management for TravelSplit
//!
//! ## Path Resolution Order
//!
//! 1. `TRAVELSPLIT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `travelsplit`
//!    (`~/.config/travelsplit` on Linux, `%APPDATA%\travelsplit\config` on
//!    Windows, `~/Library/Application Support/travelsplit` on macOS)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LedgerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TRAVELSPLIT_DATA_DIR";

/// Manages all paths used by TravelSplit
#[derive(Debug, Clone)]
pub struct SplitPaths {
    base_dir: PathBuf,
}

impl SplitPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the guest session's collections
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    ProjectDirs::from("", "", "travelsplit")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| LedgerError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(DATA_DIR_ENV, temp_dir.path());
        let paths = SplitPaths::new().unwrap();
        env::remove_var(DATA_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().join("nested"));

        assert!(!paths.is_initialized());
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
    }
}
