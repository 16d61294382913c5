//! Focus session storage in the local `SQLite` database.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{NewSession, SessionStore};
use crate::error::{PersistenceError, TomatoError};
use crate::focus::{start_of_day, FocusSession, Phase, SessionId, SessionStatus};
use crate::storage::Database;

const SESSION_COLUMNS: &str = "id, goal_id, session_type, duration, completed_duration, \
                               status, started_at, completed_at";

/// Session store backed by the local database.
#[derive(Debug)]
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, TomatoError> {
        Ok(Self::with_database(Database::open_at(path)?))
    }

    /// Create storage with an existing database connection.
    #[must_use]
    pub fn with_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Count completed work sessions created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_completed_work_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<u32, PersistenceError> {
        let db = self.db.lock().await;
        db.connection()
            .query_row(
                r"SELECT COUNT(*)
                  FROM focus_sessions
                  WHERE status = 'completed'
                    AND session_type = 'work'
                    AND created_at >= ?1",
                [timestamp(since)],
                |row| row.get(0),
            )
            .map_err(storage_error("count sessions"))
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn create_session(&self, session: &NewSession) -> Result<SessionId, PersistenceError> {
        let id = Uuid::new_v4().to_string();
        let db = self.db.lock().await;

        db.connection()
            .execute(
                r"INSERT INTO focus_sessions
                  (id, goal_id, session_type, duration, completed_duration, status, started_at, created_at)
                  VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7)",
                params![
                    id,
                    session.goal_id,
                    session.session_type.as_str(),
                    session.duration_seconds,
                    SessionStatus::Active.as_str(),
                    timestamp(session.started_at),
                    timestamp(Utc::now()),
                ],
            )
            .map_err(storage_error("insert session"))?;

        Ok(SessionId(id))
    }

    async fn complete_session(
        &self,
        id: &SessionId,
        completed_duration_seconds: u32,
    ) -> Result<(), PersistenceError> {
        let db = self.db.lock().await;

        let rows = db
            .connection()
            .execute(
                r"UPDATE focus_sessions SET
                  status = ?1,
                  completed_duration = ?2,
                  completed_at = ?3
                  WHERE id = ?4",
                params![
                    SessionStatus::Completed.as_str(),
                    completed_duration_seconds,
                    timestamp(Utc::now()),
                    id.0,
                ],
            )
            .map_err(storage_error("update session"))?;

        if rows == 0 {
            return Err(PersistenceError::Storage(format!("no session with id {id}")));
        }
        Ok(())
    }

    async fn count_completed_work_sessions_today(&self) -> Result<u32, PersistenceError> {
        self.count_completed_work_since(start_of_day(&Local::now()))
            .await
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<FocusSession>, PersistenceError> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM focus_sessions ORDER BY started_at DESC LIMIT ?1"
            ))
            .map_err(storage_error("prepare query"))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map([limit], row_to_session)
            .map_err(storage_error("query sessions"))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(storage_error("read session"))
    }
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn storage_error(context: &'static str) -> impl Fn(rusqlite::Error) -> PersistenceError {
    move |e| match e {
        rusqlite::Error::FromSqlConversionFailure(_, _, inner) => {
            PersistenceError::Decode(inner.to_string())
        }
        other => PersistenceError::Storage(format!("Failed to {context}: {other}")),
    }
}

fn decode_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(PersistenceError::Decode(message)),
    )
}

fn parse_timestamp(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| decode_error(column, format!("bad timestamp {value:?}: {e}")))
}

/// Convert a database row to a `FocusSession`.
fn row_to_session(row: &Row<'_>) -> Result<FocusSession, rusqlite::Error> {
    let id: String = row.get(0)?;
    let goal_id: Option<String> = row.get(1)?;
    let session_type: String = row.get(2)?;
    let duration_seconds: u32 = row.get(3)?;
    let completed_duration: u32 = row.get(4)?;
    let status: String = row.get(5)?;
    let started_at: String = row.get(6)?;
    let completed_at: Option<String> = row.get(7)?;

    let session_type = Phase::parse(&session_type)
        .ok_or_else(|| decode_error(2, format!("unknown session type {session_type:?}")))?;
    let status = SessionStatus::parse(&status)
        .ok_or_else(|| decode_error(5, format!("unknown status {status:?}")))?;
    let started_at = parse_timestamp(6, &started_at)?;
    let completed_at = completed_at
        .as_deref()
        .map(|t| parse_timestamp(7, t))
        .transpose()?;

    Ok(FocusSession {
        id: Some(SessionId(id)),
        session_type,
        duration_seconds,
        elapsed_seconds: completed_duration.min(duration_seconds),
        status,
        started_at,
        completed_at,
        goal_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rusqlite::OptionalExtension;

    impl SqliteStore {
        async fn get(&self, id: &SessionId) -> Result<Option<FocusSession>, PersistenceError> {
            let db = self.db.lock().await;
            db.connection()
                .query_row(
                    &format!("SELECT {SESSION_COLUMNS} FROM focus_sessions WHERE id = ?1"),
                    [&id.0],
                    row_to_session,
                )
                .optional()
                .map_err(storage_error("query session"))
        }
    }

    fn create_test_storage() -> SqliteStore {
        let db = Database::open_in_memory().unwrap();
        SqliteStore::with_database(db)
    }

    fn work(duration_seconds: u32) -> NewSession {
        NewSession {
            session_type: Phase::Work,
            duration_seconds,
            started_at: Utc::now(),
            goal_id: Some("goal-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage = create_test_storage();

        let id = storage.create_session(&work(1500)).await.unwrap();
        let loaded = storage.get(&id).await.unwrap().unwrap();

        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.session_type, Phase::Work);
        assert_eq!(loaded.duration_seconds, 1500);
        assert_eq!(loaded.elapsed_seconds, 0);
        assert_eq!(loaded.status, SessionStatus::Active);
        assert!(loaded.completed_at.is_none());
        assert_eq!(loaded.goal_id.as_deref(), Some("goal-1"));
    }

    #[tokio::test]
    async fn test_complete_session() {
        let storage = create_test_storage();
        let id = storage.create_session(&work(60)).await.unwrap();

        storage.complete_session(&id, 60).await.unwrap();

        let loaded = storage.get(&id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SessionStatus::Completed);
        assert_eq!(loaded.elapsed_seconds, 60);
        assert!(loaded.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_complete_unknown_session() {
        let storage = create_test_storage();
        let err = storage
            .complete_session(&SessionId::from("missing"), 60)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Storage(_)));
    }

    #[tokio::test]
    async fn test_count_only_completed_work_today() {
        let storage = create_test_storage();

        for _ in 0..3 {
            let id = storage.create_session(&work(60)).await.unwrap();
            storage.complete_session(&id, 60).await.unwrap();
        }
        // Active work session
        storage.create_session(&work(60)).await.unwrap();
        // Completed break
        let break_id = storage
            .create_session(&NewSession {
                session_type: Phase::Break,
                duration_seconds: 300,
                started_at: Utc::now(),
                goal_id: None,
            })
            .await
            .unwrap();
        storage.complete_session(&break_id, 300).await.unwrap();

        assert_eq!(storage.count_completed_work_sessions_today().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_count_ignores_earlier_days() {
        let storage = create_test_storage();
        {
            let db = storage.db.lock().await;
            db.connection()
                .execute(
                    "INSERT INTO focus_sessions
                     (id, session_type, duration, completed_duration, status, started_at, created_at)
                     VALUES ('old', 'work', 60, 60, 'completed', ?1, ?1)",
                    [timestamp(Utc::now() - Duration::days(2))],
                )
                .unwrap();
        }

        let since = Utc::now() - Duration::days(1);
        assert_eq!(storage.count_completed_work_since(since).await.unwrap(), 0);
        let since = Utc::now() - Duration::days(3);
        assert_eq!(storage.count_completed_work_since(since).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recent_sessions_newest_first() {
        let storage = create_test_storage();
        let base = Utc::now();

        for i in 0..5 {
            let session = NewSession {
                started_at: base + Duration::minutes(i),
                ..work(60)
            };
            storage.create_session(&session).await.unwrap();
        }

        let recent = storage.recent_sessions(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent[0].started_at > recent[1].started_at);
        assert!(recent[1].started_at > recent[2].started_at);
    }

    #[tokio::test]
    async fn test_undecodable_row() {
        let storage = create_test_storage();
        {
            let db = storage.db.lock().await;
            db.connection()
                .execute(
                    "INSERT INTO focus_sessions
                     (id, session_type, duration, started_at, created_at)
                     VALUES ('weird', 'nap', 60, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
                    [],
                )
                .unwrap();
        }

        let err = storage.recent_sessions(10).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Decode(_)));
    }
}
