//! tomato - a Pomodoro focus timer for the terminal
//!
//! This crate provides the focus session engine, session persistence (local
//! `SQLite` or a hosted PostgREST backend) and the terminal interface that
//! drives them.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod focus;
pub mod logging;
pub mod output;
pub mod persistence;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TomatoError;
pub use focus::FocusEngine;
