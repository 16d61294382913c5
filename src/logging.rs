//! Log output setup.
//!
//! `RUST_LOG` wins over `logging.level`. The timer screen owns the terminal,
//! so while it is open logs go to a file instead of stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LoggingConfig, Paths};
use crate::error::TomatoError;

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

impl LogTarget {
    /// Pick the target for a run. Interactive runs always log to a file.
    #[must_use]
    pub fn resolve(config: &LoggingConfig, paths: &Paths, interactive: bool) -> Self {
        match (&config.file, interactive) {
            (Some(file), _) => Self::File(file.clone()),
            (None, true) => Self::File(paths.log_file.clone()),
            (None, false) => Self::Stderr,
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the log file cannot be opened,
/// or a subscriber is already installed.
pub fn init(config: &LoggingConfig, target: &LogTarget) -> Result<(), TomatoError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TomatoError::Config(format!("Invalid log level {:?}: {e}", config.level)))?;

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| TomatoError::Config(format!("Failed to initialize logging: {e}")))
}
