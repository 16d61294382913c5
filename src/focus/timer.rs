//! Countdown timer for focus sessions.
//!
//! The timer counts whole seconds, one per `tick()`. It never looks at the
//! wall clock, so a throttled tick source makes it run slow.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Loaded with a full duration, not started
    Idle,
    /// Timer is running
    Running,
    /// Timer is paused
    Paused,
    /// Timer has completed
    Completed,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A countdown timer.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Total duration in seconds
    total_seconds: u32,
    /// Remaining seconds
    remaining_seconds: u32,
    /// Current state
    state: TimerState,
}

impl Timer {
    /// Create an idle timer with the given duration in seconds.
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            total_seconds: seconds,
            remaining_seconds: seconds,
            state: TimerState::Idle,
        }
    }

    /// Start or resume the timer.
    pub fn start(&mut self) {
        if self.remaining_seconds > 0 && self.state != TimerState::Completed {
            self.state = TimerState::Running;
        }
    }

    /// Pause the timer.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Tick the timer by one second.
    ///
    /// Returns true if the timer just completed.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        if self.remaining_seconds == 0 {
            self.state = TimerState::Completed;
            true
        } else {
            false
        }
    }

    /// Stop counting and mark the timer completed, whatever is left.
    pub fn finish(&mut self) {
        self.state = TimerState::Completed;
    }

    /// Load a new full duration, keeping the current state.
    pub fn rearm(&mut self, seconds: u32) {
        self.total_seconds = seconds;
        self.remaining_seconds = seconds;
    }

    /// Reload the original duration and go back to idle.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.total_seconds;
        self.state = TimerState::Idle;
    }

    /// Remaining seconds.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Elapsed seconds.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u32 {
        self.total_seconds - self.remaining_seconds
    }

    /// Total seconds the timer was loaded with.
    #[must_use]
    pub const fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Get remaining time as Duration.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::seconds(i64::from(self.remaining_seconds))
    }

    /// Get progress as a fraction (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 1.0;
        }
        1.0 - (f64::from(self.remaining_seconds) / f64::from(self.total_seconds))
    }

    /// Check if the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Get the current state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Format remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_duration_mmss(self.remaining())
    }
}

/// Format a duration as MM:SS.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().abs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_new() {
        let timer = Timer::new(25 * 60);
        assert_eq!(timer.remaining().num_minutes(), 25);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_timer_tick() {
        let mut timer = Timer::new(60);
        timer.start();

        for _ in 0..59 {
            assert!(!timer.tick());
            assert!(timer.is_running());
        }

        assert!(timer.tick());
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(timer.elapsed_seconds(), 60);
    }

    #[test]
    fn test_timer_ignores_ticks_when_not_running() {
        let mut timer = Timer::new(10);
        assert!(!timer.tick());
        timer.start();
        timer.pause();
        assert!(!timer.tick());
        assert_eq!(timer.remaining_seconds(), 10);
    }

    #[test]
    fn test_timer_pause_resume() {
        let mut timer = Timer::new(25 * 60);
        timer.start();
        timer.tick();
        timer.pause();
        assert_eq!(timer.state(), TimerState::Paused);

        timer.start();
        assert!(timer.is_running());
        assert_eq!(timer.remaining_seconds(), 25 * 60 - 1);
    }

    #[test]
    fn test_completed_timer_does_not_restart() {
        let mut timer = Timer::new(1);
        timer.start();
        timer.tick();
        timer.rearm(300);
        timer.start();
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(timer.remaining_seconds(), 300);
    }

    #[test]
    fn test_timer_reset() {
        let mut timer = Timer::new(100);
        timer.start();
        for _ in 0..40 {
            timer.tick();
        }
        timer.reset();
        assert_eq!(timer.remaining_seconds(), 100);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_timer_progress() {
        let mut timer = Timer::new(100);
        timer.start();

        assert!(timer.progress().abs() < f64::EPSILON);

        for _ in 0..50 {
            timer.tick();
        }

        assert!((timer.progress() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(25)), "25 minutes");
        assert_eq!(format_duration(Duration::minutes(1)), "1 minute");
        assert_eq!(format_duration(Duration::hours(2)), "2 hours");
        assert_eq!(format_duration(Duration::minutes(90)), "1 hour, 30 minutes");
        assert_eq!(format_duration(Duration::seconds(45)), "45 seconds");
    }

    #[test]
    fn test_format_duration_mmss() {
        assert_eq!(format_duration_mmss(Duration::minutes(25)), "25:00");
        assert_eq!(format_duration_mmss(Duration::seconds(90)), "01:30");
        assert_eq!(format_duration_mmss(Duration::seconds(0)), "00:00");
    }
}
