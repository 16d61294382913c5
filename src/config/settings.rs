//! Configuration settings for tomato.
//!
//! Settings are loaded from `~/.tomato/config.yaml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::TomatoError;
use crate::focus::WorkDuration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Focus timer settings.
    pub focus: FocusConfig,
    /// Where sessions are stored.
    pub storage: StorageConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
}

/// Focus timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Work session length in minutes, 1 to 60.
    pub work_minutes: WorkDuration,
    /// Ring the terminal bell when a session completes.
    #[serde(default = "default_true")]
    pub notifications: bool,
}

/// Session store selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Don't persist sessions.
    None,
    /// Local `SQLite` database.
    #[default]
    Sqlite,
    /// Hosted PostgREST backend.
    Rest,
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Which store to use.
    pub backend: Backend,
    /// Database file, overriding `~/.tomato/tomato.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    /// Hosted backend settings.
    pub rest: RestConfig,
}

/// Hosted backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Option<String>,
    /// Project API key sent as `apikey`.
    pub api_key: Option<String>,
    /// Signed-in user's access token.
    pub access_token: Option<String>,
    /// Signed-in user's id.
    pub user_id: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Credentials of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// Bearer token
    pub access_token: String,
    /// Row owner
    pub user_id: String,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of text.
    pub json: bool,
    /// Log file for the timer screen, overriding `~/.tomato/tomato.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            work_minutes: WorkDuration::DEFAULT,
            notifications: default_true(),
        }
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            access_token: None,
            user_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}

impl RestConfig {
    /// The signed-in user, if both token and id are present.
    #[must_use]
    pub fn user_session(&self) -> Option<UserSession> {
        let access_token = self.access_token.clone().filter(|t| !t.is_empty())?;
        let user_id = self.user_id.clone().filter(|u| !u.is_empty())?;
        Some(UserSession {
            access_token,
            user_id,
        })
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, TomatoError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            TomatoError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            TomatoError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), TomatoError> {
        let contents = self.to_yaml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents).map_err(|e| {
            TomatoError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Render the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, TomatoError> {
        serde_yaml::to_string(self)
            .map_err(|e| TomatoError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Apply `TOMATO_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let rest = &mut self.storage.rest;
        let overrides = [
            ("TOMATO_REST_URL", &mut rest.url),
            ("TOMATO_API_KEY", &mut rest.api_key),
            ("TOMATO_ACCESS_TOKEN", &mut rest.access_token),
            ("TOMATO_USER_ID", &mut rest.user_id),
        ];

        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!(key, "config value taken from environment");
                *slot = Some(value);
            }
        }
    }

    /// Check settings that cannot be expressed in the types.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<(), TomatoError> {
        if self.storage.backend == Backend::Rest {
            let rest = &self.storage.rest;
            if rest.url.as_deref().map_or(true, str::is_empty) {
                return Err(TomatoError::Config(
                    "storage.rest.url is required for the rest backend".to_string(),
                ));
            }
            if rest.api_key.as_deref().map_or(true, str::is_empty) {
                return Err(TomatoError::Config(
                    "storage.rest.api_key is required for the rest backend".to_string(),
                ));
            }
            if rest.timeout_secs == 0 {
                return Err(TomatoError::Config(
                    "storage.rest.timeout_secs must be positive".to_string(),
                ));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(TomatoError::Config("logging.level is empty".to_string()));
        }

        Ok(())
    }
}
