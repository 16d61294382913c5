//! Daily focus figures.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{WorkDuration, SESSIONS_PER_CYCLE};

/// What the day looks like so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Work sessions completed today
    pub completed_work_sessions: u32,
    /// Approximate focus time in hours, one decimal
    pub focus_hours: f64,
    /// Full Pomodoro cycles completed
    pub cycles: u32,
}

impl DailySummary {
    /// Derive the summary from today's count and the configured work length.
    #[must_use]
    pub fn new(completed_work_sessions: u32, work: WorkDuration) -> Self {
        let minutes = f64::from(completed_work_sessions) * f64::from(work.minutes());
        Self {
            completed_work_sessions,
            focus_hours: (minutes / 60.0 * 10.0).round() / 10.0,
            cycles: completed_work_sessions / SESSIONS_PER_CYCLE,
        }
    }
}

/// Midnight of the day containing `now`, in `now`'s timezone, as UTC.
#[must_use]
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            || DateTime::from_naive_utc_and_offset(midnight, Utc),
            |t| t.with_timezone(&Utc),
        )
}
