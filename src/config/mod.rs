//! Configuration management for tomato.
//!
//! This module handles loading and saving configuration from `~/.tomato/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    Backend, Config, FocusConfig, GeneralConfig, LoggingConfig, RestConfig, StorageConfig,
    UserSession,
};
