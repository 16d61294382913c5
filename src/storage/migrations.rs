//! Database migrations for tomato.
//!
//! Each migration upgrades the schema by one version. Migrations are run
//! automatically when the database is opened.

use rusqlite::Connection;

use crate::error::TomatoError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, TomatoError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| TomatoError::Database(format!("Failed to get schema version: {e}")))
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), TomatoError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| TomatoError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), TomatoError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
        tracing::info!(version, "database migrated");
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), TomatoError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(TomatoError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: focus session history.
///
/// Columns mirror the hosted `focus_sessions` table so rows look the same
/// whichever backend wrote them.
fn migrate_v1(conn: &Connection) -> Result<(), TomatoError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS focus_sessions (
            id TEXT PRIMARY KEY,
            goal_id TEXT,
            session_type TEXT NOT NULL DEFAULT 'work',
            duration INTEGER NOT NULL,
            completed_duration INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'active',
            started_at TEXT NOT NULL,
            completed_at TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_started
        ON focus_sessions(started_at);

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_status_type
        ON focus_sessions(status, session_type, created_at);
        ",
    )
    .map_err(|e| TomatoError::Database(format!("Migration v1 failed: {e}")))
}
