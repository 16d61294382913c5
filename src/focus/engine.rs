//! The focus session engine.
//!
//! One engine drives one timer. It owns the countdown, picks the next phase
//! when a session ends and submits persistence requests as side effects.
//! Everything here is synchronous; the tick source and the persistence
//! worker live elsewhere and talk to the engine through plain method calls
//! and a channel.

use chrono::Utc;
use thiserror::Error;

use super::phase::{next_phase, Phase, WorkDuration};
use super::session::{FocusSession, SessionId, SessionKey};
use super::stats::DailySummary;
use super::timer::{Timer, TimerState};
use crate::persistence::{NewSession, PersistenceHandle, PersistenceRequest};

/// An action the engine refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The action is not valid in the current state.
    #[error("cannot {action} while the timer is {state}")]
    NotAllowed {
        /// Attempted action
        action: &'static str,
        /// State the timer was in
        state: TimerState,
    },

    /// Work duration outside `[1, 60]` minutes.
    #[error("work duration must be between 1 and 60 minutes, got {0}")]
    WorkDurationOutOfRange(u32),
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The finalized record
    pub session: FocusSession,
    /// Phase that just ended
    pub finished: Phase,
    /// Phase loaded for the next start
    pub next: Phase,
    /// Work sessions completed today, including this one
    pub completed_work_today: u32,
}

#[derive(Debug)]
struct CurrentSession {
    key: SessionKey,
    record: FocusSession,
}

/// Pomodoro state machine for one timer.
#[derive(Debug)]
pub struct FocusEngine {
    timer: Timer,
    phase: Phase,
    work_duration: WorkDuration,
    completed_work_today: u32,
    goal_id: Option<String>,
    current: Option<CurrentSession>,
    persistence: PersistenceHandle,
}

impl FocusEngine {
    /// Create an idle engine loaded with a work session.
    #[must_use]
    pub fn new(work_duration: WorkDuration, persistence: PersistenceHandle) -> Self {
        Self {
            timer: Timer::new(Phase::Work.duration_seconds(work_duration)),
            phase: Phase::Work,
            work_duration,
            completed_work_today: 0,
            goal_id: None,
            current: None,
            persistence,
        }
    }

    /// Seed the daily counter, typically from the store on startup.
    pub fn seed_completed_work(&mut self, count: u32) {
        self.completed_work_today = count;
    }

    /// Dedicate the next started session to a goal.
    pub fn set_goal(&mut self, goal_id: Option<String>) {
        self.goal_id = goal_id;
    }

    /// Start a session for the current phase.
    ///
    /// A completed timer moves back to idle first, so the next phase can be
    /// started straight away.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAllowed` while running or paused.
    pub fn start(&mut self) -> Result<SessionKey, TransitionError> {
        self.require("start", &[TimerState::Idle, TimerState::Completed])?;

        let duration = self.phase.duration_seconds(self.work_duration);
        self.timer = Timer::new(duration);
        self.timer.start();

        let key = SessionKey::new();
        let record = FocusSession::new(self.phase, duration, self.goal_id.clone());
        self.persistence.submit(PersistenceRequest::Create {
            key,
            session: NewSession::from(&record),
        });
        self.current = Some(CurrentSession { key, record });

        tracing::debug!(%key, phase = self.phase.as_str(), duration, "session started");
        Ok(key)
    }

    /// Count down one second.
    ///
    /// Returns the completion if this tick finished the session. Ticks that
    /// arrive while the timer is not running are ignored.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.timer.is_running() {
            return None;
        }

        let finished = self.timer.tick();
        if let Some(current) = self.current.as_mut() {
            current.record.advance_to(self.timer.elapsed_seconds());
        }

        if finished {
            let current = self.take_running_session()?;
            Some(self.finish(current))
        } else {
            None
        }
    }

    /// Pause the running session. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAllowed` unless running.
    pub fn pause(&mut self) -> Result<(), TransitionError> {
        self.require("pause", &[TimerState::Running])?;
        self.timer.pause();
        if let Some(current) = self.current.as_mut() {
            current.record.pause();
        }
        tracing::debug!(remaining = self.timer.remaining_seconds(), "session paused");
        Ok(())
    }

    /// Resume a paused session from where it stopped.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAllowed` unless paused.
    pub fn resume(&mut self) -> Result<(), TransitionError> {
        self.require("resume", &[TimerState::Paused])?;
        self.timer.start();
        if let Some(current) = self.current.as_mut() {
            current.record.resume();
        }
        tracing::debug!(remaining = self.timer.remaining_seconds(), "session resumed");
        Ok(())
    }

    /// Finish the running session now, keeping the time counted so far.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAllowed` unless running.
    pub fn complete(&mut self) -> Result<Completion, TransitionError> {
        self.require("complete", &[TimerState::Running])?;
        let current = self
            .take_running_session()
            .ok_or(TransitionError::NotAllowed {
                action: "complete",
                state: TimerState::Idle,
            })?;
        Ok(self.finish(current))
    }

    /// Drop the current session without completing it and reload the full
    /// duration of the current phase.
    pub fn reset(&mut self) {
        if let Some(current) = self.current.take() {
            if current.record.is_active() {
                self.persistence
                    .submit(PersistenceRequest::Release { key: current.key });
                tracing::debug!(key = %current.key, "session discarded");
            }
        }
        self.timer.reset();
    }

    /// Choose the phase for the next start.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAllowed` while a session is in progress.
    pub fn select_phase(&mut self, phase: Phase) -> Result<(), TransitionError> {
        self.require("change phase", &[TimerState::Idle, TimerState::Completed])?;
        self.phase = phase;
        self.current = None;
        self.timer = Timer::new(phase.duration_seconds(self.work_duration));
        Ok(())
    }

    /// Change the work session length.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotAllowed` while a session is in progress.
    pub fn set_work_duration(&mut self, duration: WorkDuration) -> Result<(), TransitionError> {
        self.require(
            "change the work duration",
            &[TimerState::Idle, TimerState::Completed],
        )?;
        self.work_duration = duration;
        if self.phase == Phase::Work {
            self.current = None;
            self.timer = Timer::new(duration.seconds());
        }
        Ok(())
    }

    /// Record the store id of the current session.
    ///
    /// Ignored if `key` belongs to a session that is no longer current.
    pub fn attach_session_id(&mut self, key: SessionKey, id: SessionId) {
        if let Some(current) = self.current.as_mut().filter(|c| c.key == key) {
            current.record.id = Some(id);
        }
    }

    /// Current timer state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.timer.state()
    }

    /// Whether the countdown is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Phase the timer is loaded with.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left on the timer.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    /// Remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        self.timer.format_remaining()
    }

    /// Fraction of the loaded duration already counted.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.timer.progress()
    }

    /// Configured work session length.
    #[must_use]
    pub const fn work_duration(&self) -> WorkDuration {
        self.work_duration
    }

    /// Work sessions completed today.
    #[must_use]
    pub const fn completed_work_today(&self) -> u32 {
        self.completed_work_today
    }

    /// Goal the next session will be dedicated to.
    #[must_use]
    pub fn goal_id(&self) -> Option<&str> {
        self.goal_id.as_deref()
    }

    /// The session in progress or just completed.
    #[must_use]
    pub fn session(&self) -> Option<&FocusSession> {
        self.current.as_ref().map(|c| &c.record)
    }

    /// Today's figures.
    #[must_use]
    pub fn summary(&self) -> DailySummary {
        DailySummary::new(self.completed_work_today, self.work_duration)
    }

    fn require(&self, action: &'static str, allowed: &[TimerState]) -> Result<(), TransitionError> {
        let state = self.timer.state();
        if allowed.contains(&state) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed { action, state })
        }
    }

    /// Take the record of the running session.
    ///
    /// A running timer always has one. If it doesn't, the timer goes back to
    /// idle rather than completing a session nobody saved.
    fn take_running_session(&mut self) -> Option<CurrentSession> {
        let current = self.current.take();
        if current.is_none() {
            tracing::warn!(
                phase = self.phase.as_str(),
                "timer ran without a session record; resetting"
            );
            self.timer.reset();
        }
        current
    }

    fn finish(&mut self, mut current: CurrentSession) -> Completion {
        self.timer.finish();
        let finished = self.phase;

        current.record.advance_to(self.timer.elapsed_seconds());
        current.record.complete(Utc::now());
        self.persistence.submit(PersistenceRequest::Complete {
            key: current.key,
            completed_duration_seconds: current.record.elapsed_seconds,
        });
        let session = current.record.clone();
        self.current = Some(current);

        if finished == Phase::Work {
            self.completed_work_today += 1;
        }
        let next = next_phase(finished, self.completed_work_today);
        self.phase = next;
        self.timer.rearm(next.duration_seconds(self.work_duration));

        tracing::info!(
            finished = finished.as_str(),
            next = next.as_str(),
            elapsed = session.elapsed_seconds,
            completed_today = self.completed_work_today,
            "session completed"
        );

        Completion {
            session,
            finished,
            next,
            completed_work_today: self.completed_work_today,
        }
    }
}
