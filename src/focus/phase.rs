//! Pomodoro phases and the rule that sequences them.

use serde::{Deserialize, Serialize};

use super::engine::TransitionError;

/// Short break length in seconds.
pub const SHORT_BREAK_SECONDS: u32 = 5 * 60;

/// Long break length in seconds.
pub const LONG_BREAK_SECONDS: u32 = 15 * 60;

/// Completed work sessions per cycle; every cycle ends with a long break.
pub const SESSIONS_PER_CYCLE: u32 = 4;

/// Phase of the Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Focused work
    #[serde(rename = "work")]
    Work,
    /// Short break (5 minutes)
    #[serde(rename = "break")]
    Break,
    /// Long break (15 minutes)
    #[serde(rename = "longbreak")]
    LongBreak,
}

impl Phase {
    /// Name used by the session backends.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
            Self::LongBreak => "longbreak",
        }
    }

    /// Parse a backend name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "work" => Some(Self::Work),
            "break" => Some(Self::Break),
            "longbreak" => Some(Self::LongBreak),
            _ => None,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "Focus Time",
            Self::Break => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Check if this is a break phase.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::Break | Self::LongBreak)
    }

    /// Full length of this phase in seconds.
    ///
    /// Only work sessions use the configured duration; breaks are fixed.
    #[must_use]
    pub const fn duration_seconds(&self, work: WorkDuration) -> u32 {
        match self {
            Self::Work => work.seconds(),
            Self::Break => SHORT_BREAK_SECONDS,
            Self::LongBreak => LONG_BREAK_SECONDS,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Select the phase that follows `current`.
///
/// `completed_work` is today's completed work count *after* the session that
/// just finished has been counted.
#[must_use]
pub const fn next_phase(current: Phase, completed_work: u32) -> Phase {
    match current {
        Phase::Work => {
            if completed_work > 0 && completed_work % SESSIONS_PER_CYCLE == 0 {
                Phase::LongBreak
            } else {
                Phase::Break
            }
        }
        Phase::Break | Phase::LongBreak => Phase::Work,
    }
}

/// Work session length in whole minutes, between 1 and 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WorkDuration(u32);

impl WorkDuration {
    /// Shortest allowed work session.
    pub const MIN_MINUTES: u32 = 1;
    /// Longest allowed work session.
    pub const MAX_MINUTES: u32 = 60;
    /// Classic Pomodoro length.
    pub const DEFAULT: Self = Self(25);

    /// Validate a minute count.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::WorkDurationOutOfRange` outside `[1, 60]`.
    pub const fn new(minutes: u32) -> Result<Self, TransitionError> {
        if minutes < Self::MIN_MINUTES || minutes > Self::MAX_MINUTES {
            Err(TransitionError::WorkDurationOutOfRange(minutes))
        } else {
            Ok(Self(minutes))
        }
    }

    /// Build from any minute count, clamping into range.
    #[must_use]
    pub const fn saturating(minutes: u32) -> Self {
        if minutes < Self::MIN_MINUTES {
            Self(Self::MIN_MINUTES)
        } else if minutes > Self::MAX_MINUTES {
            Self(Self::MAX_MINUTES)
        } else {
            Self(minutes)
        }
    }

    /// Length in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Length in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0 * 60
    }
}

impl Default for WorkDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for WorkDuration {
    type Error = TransitionError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<WorkDuration> for u32 {
    fn from(duration: WorkDuration) -> Self {
        duration.0
    }
}
