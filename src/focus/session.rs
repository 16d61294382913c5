//! Focus session records.
//!
//! A record is created when a session starts and finalized when it completes.
//! Between those points only the local copy changes.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::phase::Phase;

/// Identifier assigned by a session store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Local handle for a session whose store id may not be known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(Uuid);

impl SessionKey {
    /// Generate a fresh key.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Session is counting down
    Active,
    /// Session is paused
    Paused,
    /// Session ran to the end
    Completed,
}

impl SessionStatus {
    /// Name used by the session backends.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Parse a backend name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// A focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    /// Store id (None until the store has acknowledged the create)
    pub id: Option<SessionId>,
    /// Phase this session covers
    pub session_type: Phase,
    /// Planned length in seconds
    pub duration_seconds: u32,
    /// Seconds counted down so far
    pub elapsed_seconds: u32,
    /// Current status
    pub status: SessionStatus,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Goal the session is dedicated to
    pub goal_id: Option<String>,
}

impl FocusSession {
    /// Create a new active session starting now.
    #[must_use]
    pub fn new(session_type: Phase, duration_seconds: u32, goal_id: Option<String>) -> Self {
        Self {
            id: None,
            session_type,
            duration_seconds,
            elapsed_seconds: 0,
            status: SessionStatus::Active,
            started_at: Utc::now(),
            completed_at: None,
            goal_id,
        }
    }

    /// Record progress, never past the planned duration.
    pub fn advance_to(&mut self, elapsed_seconds: u32) {
        self.elapsed_seconds = elapsed_seconds.min(self.duration_seconds);
    }

    /// Pause the session.
    pub fn pause(&mut self) {
        if self.status == SessionStatus::Active {
            self.status = SessionStatus::Paused;
        }
    }

    /// Resume a paused session.
    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Active;
        }
    }

    /// Complete the session.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
    }

    /// Check if the session is active (running or paused).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::Active | SessionStatus::Paused)
    }

    /// Get start time in local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }
}
