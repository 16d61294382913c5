//! Output formatting for tomato.
//!
//! This module renders command results as colored text or JSON.

mod json;
mod pretty;

use chrono::NaiveDate;

use crate::cli::args::OutputFormat;
use crate::error::TomatoError;
use crate::focus::{DailySummary, FocusSession};

pub use json::*;
pub use pretty::*;

/// Format today's figures based on output format
///
/// # Errors
///
/// Returns `TomatoError::Json` if JSON serialization fails.
pub fn format_today(
    summary: &DailySummary,
    date: NaiveDate,
    format: OutputFormat,
) -> Result<String, TomatoError> {
    match format {
        OutputFormat::Pretty => Ok(format_today_pretty(summary, date)),
        OutputFormat::Json => format_today_json(summary, date),
    }
}

/// Format session history based on output format
///
/// # Errors
///
/// Returns `TomatoError::Json` if JSON serialization fails.
pub fn format_history(sessions: &[FocusSession], format: OutputFormat) -> Result<String, TomatoError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(sessions)),
        OutputFormat::Json => format_history_json(sessions),
    }
}
