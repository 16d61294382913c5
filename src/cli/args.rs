use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::focus::{Phase, WorkDuration};

#[derive(Parser)]
#[command(name = "tomato")]
#[command(about = "A Pomodoro focus timer for the terminal")]
#[command(long_about = "tomato - a Pomodoro focus timer for the terminal

Alternates focus sessions with short breaks, and a long break after every
fourth focus session. Sessions are saved to a local database or to a hosted
backend so the daily count survives restarts.

QUICK START:
  tomato start              Open the timer with a 25 minute focus session
  tomato start -m 50        Use 50 minute focus sessions
  tomato today              Show today's focus count
  tomato history            List recent sessions

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  tomato <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Config file to use instead of ~/.tomato/config.yaml
    #[arg(long, global = true, env = "TOMATO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the focus timer
    ///
    /// Shows a full-screen countdown driven from the keyboard:
    ///
    ///   space/enter   start, pause or resume
    ///   s             complete the session now
    ///   r             reset the timer
    ///   w / b / l     focus, short break, long break
    ///   + / -         focus length by one minute
    ///   ?             help
    ///   q / esc       quit
    ///
    /// # Examples
    ///
    ///   tomato start
    ///   tomato start --minutes 50
    ///   tomato start --phase long-break
    ///   tomato start --goal 3f2c9a
    #[command(alias = "s")]
    Start(StartArgs),

    /// Show today's focus figures
    ///
    /// Counts focus sessions completed since local midnight, the focus
    /// hours they add up to and the number of full cycles.
    ///
    /// # Examples
    ///
    ///   tomato today
    ///   tomato today -o json
    #[command(alias = "t")]
    Today,

    /// List recent sessions
    ///
    /// Newest first, including breaks and unfinished sessions.
    ///
    /// # Examples
    ///
    ///   tomato history
    ///   tomato history --limit 50 -o json
    History {
        /// Number of sessions to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Outputs the completion script for the given shell.
    ///
    /// Example: tomato completions bash > ~/.bash_completion.d/tomato
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the timer screen.
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Focus session length in minutes (1-60)
    #[arg(long, short = 'm', value_parser = clap::value_parser!(u32).range(1..=60))]
    pub minutes: Option<u32>,

    /// Phase to load first
    #[arg(long, short = 'p', value_enum, default_value = "work")]
    pub phase: PhaseArg,

    /// Goal to dedicate the sessions to
    #[arg(long, short = 'g')]
    pub goal: Option<String>,
}

impl StartArgs {
    /// Focus length from the flag, or `fallback`.
    #[must_use]
    pub fn work_duration(&self, fallback: WorkDuration) -> WorkDuration {
        self.minutes.map_or(fallback, WorkDuration::saturating)
    }
}

/// Phase selection on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseArg {
    /// Focus session.
    Work,
    /// Short break.
    Break,
    /// Long break.
    LongBreak,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Work => Self::Work,
            PhaseArg::Break => Self::Break,
            PhaseArg::LongBreak => Self::LongBreak,
        }
    }
}

/// Arguments for config management.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_start_defaults() {
        let cli = Cli::try_parse_from(["tomato", "start"]).unwrap();
        if let Commands::Start(args) = cli.command {
            assert!(args.minutes.is_none());
            assert_eq!(args.phase, PhaseArg::Work);
            assert!(args.goal.is_none());
            assert_eq!(args.work_duration(WorkDuration::DEFAULT).minutes(), 25);
        } else {
            panic!("Expected Start command");
        }
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_start_with_options() {
        let cli = Cli::try_parse_from([
            "tomato",
            "start",
            "--minutes",
            "50",
            "--phase",
            "long-break",
            "--goal",
            "abc",
        ])
        .unwrap();
        if let Commands::Start(args) = cli.command {
            assert_eq!(args.work_duration(WorkDuration::DEFAULT).minutes(), 50);
            assert_eq!(Phase::from(args.phase), Phase::LongBreak);
            assert_eq!(args.goal.as_deref(), Some("abc"));
        } else {
            panic!("Expected Start command");
        }
    }

    #[test]
    fn test_cli_start_rejects_out_of_range_minutes() {
        assert!(Cli::try_parse_from(["tomato", "start", "--minutes", "0"]).is_err());
        assert!(Cli::try_parse_from(["tomato", "start", "--minutes", "61"]).is_err());
    }

    #[test]
    fn test_cli_global_output() {
        let cli = Cli::try_parse_from(["tomato", "today", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Today));
    }

    #[test]
    fn test_cli_history_limit() {
        let cli = Cli::try_parse_from(["tomato", "history", "-n", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: 3 }));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::try_parse_from(["tomato", "config", "init", "--force"]).unwrap();
        if let Commands::Config(args) = cli.command {
            assert!(matches!(args.command, ConfigCommands::Init { force: true }));
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["tomato", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
    }
}
