//! Focus mode.
//!
//! Pomodoro-style timed sessions:
//! - Work, short break and long break phases
//! - Start/pause/resume/reset of one timer
//! - Daily session count and cycles
//! - A one-second tick source

pub mod engine;
pub mod phase;
pub mod session;
pub mod stats;
pub mod ticker;
pub mod timer;

pub use engine::{Completion, FocusEngine, TransitionError};
pub use phase::{
    next_phase, Phase, WorkDuration, LONG_BREAK_SECONDS, SESSIONS_PER_CYCLE, SHORT_BREAK_SECONDS,
};
pub use session::{FocusSession, SessionId, SessionKey, SessionStatus};
pub use stats::{start_of_day, DailySummary};
pub use ticker::Ticker;
pub use timer::{format_duration, format_duration_mmss, Timer, TimerState};
