//! Session persistence.
//!
//! The focus engine never talks to a store directly. It submits
//! [`PersistenceRequest`]s through a [`PersistenceHandle`]; a
//! [`PersistenceWorker`] performs them against a [`SessionStore`] and reports
//! back with [`PersistenceNotice`]s. Failures are logged and reported, never
//! retried, and never reach the engine.

pub mod rest;
pub mod sqlite;
pub mod worker;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::{Backend, Paths, StorageConfig};
use crate::error::{PersistenceError, TomatoError};
use crate::focus::{FocusSession, Phase, SessionId, SessionKey};

pub use rest::RestStore;
pub use sqlite::SqliteStore;
pub use worker::PersistenceWorker;

/// What a store needs to create a session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Phase the session covers
    pub session_type: Phase,
    /// Planned length in seconds
    pub duration_seconds: u32,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// Goal the session is dedicated to
    pub goal_id: Option<String>,
}

impl From<&FocusSession> for NewSession {
    fn from(session: &FocusSession) -> Self {
        Self {
            session_type: session.session_type,
            duration_seconds: session.duration_seconds,
            started_at: session.started_at,
            goal_id: session.goal_id.clone(),
        }
    }
}

/// Durable storage for focus sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new active session and return its id.
    async fn create_session(&self, session: &NewSession) -> Result<SessionId, PersistenceError>;

    /// Mark a session completed after `completed_duration_seconds` of focus.
    async fn complete_session(
        &self,
        id: &SessionId,
        completed_duration_seconds: u32,
    ) -> Result<(), PersistenceError>;

    /// Count work sessions completed since local midnight.
    async fn count_completed_work_sessions_today(&self) -> Result<u32, PersistenceError>;

    /// Most recently started sessions, newest first.
    async fn recent_sessions(&self, limit: usize) -> Result<Vec<FocusSession>, PersistenceError>;
}

/// A write the engine wants performed, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceRequest {
    /// A session started.
    Create {
        /// Local key of the session
        key: SessionKey,
        /// Row to insert
        session: NewSession,
    },
    /// A session ran to completion.
    Complete {
        /// Local key of the session
        key: SessionKey,
        /// Seconds of focus to record
        completed_duration_seconds: u32,
    },
    /// A session was reset before completing; forget it.
    Release {
        /// Local key of the session
        key: SessionKey,
    },
}

/// What the worker reports back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceNotice {
    /// The store assigned an id to a session.
    Created {
        /// Local key of the session
        key: SessionKey,
        /// Store id
        id: SessionId,
    },
    /// A store call failed.
    Failed {
        /// Operation that failed
        operation: &'static str,
        /// Error text for display
        message: String,
    },
}

/// Fire-and-forget sender for persistence requests.
///
/// A disabled handle drops every request; this is how the timer runs without
/// a backend or without a signed-in user.
#[derive(Debug, Clone, Default)]
pub struct PersistenceHandle {
    tx: Option<UnboundedSender<PersistenceRequest>>,
}

impl PersistenceHandle {
    /// Wrap a worker's request channel.
    #[must_use]
    pub const fn new(tx: UnboundedSender<PersistenceRequest>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A handle that never persists anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    /// Whether requests go anywhere.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a request without waiting for it.
    pub fn submit(&self, request: PersistenceRequest) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.send(request) {
            tracing::warn!(request = ?e.0, "persistence worker has stopped; request dropped");
        }
    }
}

/// Build the store selected by configuration.
///
/// Returns `Ok(None)` when persistence is disabled, either explicitly or
/// because the REST backend has no signed-in user.
///
/// # Errors
///
/// Returns an error if the local database cannot be opened or the REST
/// backend is misconfigured.
pub fn open_store(
    storage: &StorageConfig,
    paths: &Paths,
) -> Result<Option<Arc<dyn SessionStore>>, TomatoError> {
    match storage.backend {
        Backend::None => {
            tracing::info!("persistence disabled by configuration");
            Ok(None)
        }
        Backend::Sqlite => {
            let path = storage
                .database
                .clone()
                .unwrap_or_else(|| paths.database.clone());
            let store = SqliteStore::open(&path)?;
            Ok(Some(Arc::new(store)))
        }
        Backend::Rest => {
            let Some(user) = storage.rest.user_session() else {
                tracing::warn!("no user session configured; sessions will not be saved");
                return Ok(None);
            };
            let store = RestStore::new(&storage.rest, user)?;
            Ok(Some(Arc::new(store)))
        }
    }
}

/// Today's completed work count, or zero if the store cannot say.
pub async fn seed_daily_count(store: &dyn SessionStore) -> u32 {
    match store.count_completed_work_sessions_today().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "could not load today's session count");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_disabled_handle_drops_requests() {
        let handle = PersistenceHandle::disabled();
        assert!(!handle.is_enabled());
        handle.submit(PersistenceRequest::Release {
            key: SessionKey::new(),
        });
    }

    #[test]
    fn test_handle_forwards_requests() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PersistenceHandle::new(tx);
        let key = SessionKey::new();

        handle.submit(PersistenceRequest::Release { key });

        assert_eq!(rx.try_recv().unwrap(), PersistenceRequest::Release { key });
    }

    #[test]
    fn test_submit_after_worker_stopped_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = PersistenceHandle::new(tx);
        handle.submit(PersistenceRequest::Release {
            key: SessionKey::new(),
        });
    }

    #[tokio::test]
    async fn test_seed_daily_count_defaults_to_zero() {
        let mut store = MockSessionStore::new();
        store
            .expect_count_completed_work_sessions_today()
            .returning(|| Err(PersistenceError::Network("offline".to_string())));

        assert_eq!(seed_daily_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_seed_daily_count_uses_store() {
        let mut store = MockSessionStore::new();
        store
            .expect_count_completed_work_sessions_today()
            .returning(|| Ok(3));

        assert_eq!(seed_daily_count(&store).await, 3);
    }

    #[test]
    fn test_open_store_disabled() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().to_path_buf());
        let storage = StorageConfig {
            backend: Backend::None,
            ..StorageConfig::default()
        };
        assert!(open_store(&storage, &paths).unwrap().is_none());
    }

    #[test]
    fn test_open_store_rest_without_user_is_disabled() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().to_path_buf());
        let mut storage = StorageConfig {
            backend: Backend::Rest,
            ..StorageConfig::default()
        };
        storage.rest.url = Some("https://example.supabase.co".to_string());
        storage.rest.api_key = Some("anon".to_string());
        assert!(open_store(&storage, &paths).unwrap().is_none());
    }

    #[test]
    fn test_open_store_sqlite() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().to_path_buf());
        let storage = StorageConfig {
            database: Some(dir.path().join("sessions.db")),
            ..StorageConfig::default()
        };
        assert!(open_store(&storage, &paths).unwrap().is_some());
        assert!(dir.path().join("sessions.db").exists());
    }
}
