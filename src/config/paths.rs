//! Path resolution for tomato configuration and data files.
//!
//! All tomato data is stored in `~/.tomato/`:
//! - `config.yaml` - Main configuration file
//! - `tomato.db` - SQLite database for session history
//! - `tomato.log` - Log file written while the timer screen is open

use std::path::PathBuf;

use crate::error::TomatoError;

/// Paths to tomato configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.tomato/`
    pub root: PathBuf,
    /// Config file: `~/.tomato/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.tomato/tomato.db`
    pub database: PathBuf,
    /// Log file: `~/.tomato/tomato.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TomatoError> {
        let home = std::env::var("HOME")
            .map_err(|_| TomatoError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".tomato")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("tomato.db"),
            log_file: root.join("tomato.log"),
            root,
        }
    }

    /// Ensure the data directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TomatoError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TomatoError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".tomato"))
        })
    }
}
