//! JSON output formatting for tomato.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::error::TomatoError;
use crate::focus::{DailySummary, FocusSession};

/// Format today's figures as JSON
///
/// # Errors
///
/// Returns `TomatoError::Json` if JSON serialization fails.
pub fn format_today_json(summary: &DailySummary, date: NaiveDate) -> Result<String, TomatoError> {
    let output = json!({
        "date": date.to_string(),
        "completed_work_sessions": summary.completed_work_sessions,
        "focus_hours": summary.focus_hours,
        "cycles": summary.cycles,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format session history as JSON
///
/// # Errors
///
/// Returns `TomatoError::Json` if JSON serialization fails.
pub fn format_history_json(sessions: &[FocusSession]) -> Result<String, TomatoError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `TomatoError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TomatoError> {
    Ok(serde_json::to_string_pretty(value)?)
}
