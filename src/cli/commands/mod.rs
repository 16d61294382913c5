//! Command implementations for tomato.
//!
//! Every command returns the text to print; `main` does the printing.

mod config;
mod focus;

pub use config::config;
pub use focus::{history, start, today};

use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::{Cli, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::TomatoError;

/// What every command needs: settings, paths and the output format.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration, environment overrides applied
    pub config: Config,
    /// Data directory layout
    pub paths: Paths,
    /// Config file in use
    pub config_path: PathBuf,
    /// Output format for results
    pub format: OutputFormat,
}

impl Context {
    /// Load configuration for a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is unknown or the config file
    /// is unreadable or invalid.
    pub fn load(
        config_path: Option<PathBuf>,
        output: Option<OutputFormat>,
    ) -> Result<Self, TomatoError> {
        let paths = Paths::new()?;
        Self::load_with(paths, config_path, output)
    }

    /// Load configuration with explicit paths (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or invalid.
    pub fn load_with(
        paths: Paths,
        config_path: Option<PathBuf>,
        output: Option<OutputFormat>,
    ) -> Result<Self, TomatoError> {
        let config_path = config_path.unwrap_or_else(|| paths.config_file.clone());
        let mut config = Config::load_from_path(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;

        let format = output.unwrap_or(config.general.default_output);
        Ok(Self {
            config,
            paths,
            config_path,
            format,
        })
    }
}

/// Generate a shell completion script.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, TomatoError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "tomato", &mut buf);
    String::from_utf8(buf)
        .map_err(|e| TomatoError::Config(format!("Failed to generate completions: {e}")))
}
