//! Config management commands.

use super::Context;
use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::TomatoError;
use crate::output::to_json;

const MASK: &str = "********";

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config cannot be rendered or written.
pub fn config(ctx: &Context, cmd: &ConfigCommands) -> Result<String, TomatoError> {
    match cmd {
        ConfigCommands::Show => {
            let shown = masked(&ctx.config);
            match ctx.format {
                OutputFormat::Json => to_json(&shown),
                OutputFormat::Pretty => shown.to_yaml(),
            }
        }
        ConfigCommands::Path => Ok(ctx.config_path.display().to_string()),
        ConfigCommands::Init { force } => {
            if ctx.config_path.exists() && !force {
                return Err(TomatoError::Config(format!(
                    "{} already exists. Use --force to overwrite it.",
                    ctx.config_path.display()
                )));
            }
            Config::default().save_to_path(&ctx.config_path)?;
            Ok(format!(
                "Wrote default configuration to {}",
                ctx.config_path.display()
            ))
        }
    }
}

/// Copy of `config` with credentials hidden.
fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    let rest = &mut shown.storage.rest;
    for secret in [&mut rest.api_key, &mut rest.access_token] {
        if secret.is_some() {
            *secret = Some(MASK.to_string());
        }
    }
    shown
}
