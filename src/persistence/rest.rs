//! Focus session storage on a hosted PostgREST backend.
//!
//! Rows live in the `focus_sessions` table and are scoped to the signed-in
//! user. Every request carries the project `apikey` and the user's bearer
//! token.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{NewSession, SessionStore};
use crate::config::{RestConfig, UserSession};
use crate::error::{PersistenceError, TomatoError};
use crate::focus::{start_of_day, FocusSession, Phase, SessionId, SessionStatus};

const TABLE_PATH: &str = "/rest/v1/focus_sessions";

/// Insert body for a new session.
#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    user_id: &'a str,
    duration: u32,
    completed_duration: u32,
    session_type: &'static str,
    status: &'static str,
    started_at: String,
    goal_id: Option<&'a str>,
}

/// Update body for a completed session.
#[derive(Debug, Serialize)]
struct CompleteRow {
    status: &'static str,
    completed_duration: u32,
    completed_at: String,
}

/// A `focus_sessions` row as returned by the backend.
#[derive(Debug, Deserialize)]
struct SessionRow {
    id: serde_json::Value,
    #[serde(default)]
    goal_id: Option<String>,
    session_type: String,
    duration: u32,
    #[serde(default)]
    completed_duration: Option<u32>,
    status: String,
    started_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    fn id(&self) -> SessionId {
        // Ids are uuids in practice, but bigint keys come back as numbers.
        match &self.id {
            serde_json::Value::String(s) => SessionId(s.clone()),
            other => SessionId(other.to_string()),
        }
    }

    fn into_session(self) -> Result<FocusSession, PersistenceError> {
        let id = self.id();
        let session_type = Phase::parse(&self.session_type).ok_or_else(|| {
            PersistenceError::Decode(format!("unknown session type {:?}", self.session_type))
        })?;
        let status = SessionStatus::parse(&self.status)
            .ok_or_else(|| PersistenceError::Decode(format!("unknown status {:?}", self.status)))?;

        Ok(FocusSession {
            id: Some(id),
            session_type,
            duration_seconds: self.duration,
            elapsed_seconds: self.completed_duration.unwrap_or(0).min(self.duration),
            status,
            started_at: self.started_at,
            completed_at: self.completed_at,
            goal_id: self.goal_id,
        })
    }
}

/// Session store talking to `{url}/rest/v1/focus_sessions`.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    user: UserSession,
}

impl RestStore {
    /// Create a store for the signed-in `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or API key is missing, or the HTTP client
    /// cannot be built.
    pub fn new(config: &RestConfig, user: UserSession) -> Result<Self, TomatoError> {
        let base_url = config
            .url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TomatoError::Config("storage.rest.url is not set".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| TomatoError::Config("storage.rest.api_key is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TomatoError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            user,
        })
    }

    /// Builds a request with authentication headers.
    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, format!("{}{TABLE_PATH}", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.user.access_token)
    }

    /// Count completed work sessions created at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is unreadable.
    pub async fn count_completed_work_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<u32, PersistenceError> {
        let response = self
            .request(Method::GET)
            .query(&[
                ("select", "id".to_string()),
                ("user_id", format!("eq.{}", self.user.user_id)),
                ("status", "eq.completed".to_string()),
                ("session_type", "eq.work".to_string()),
                ("created_at", format!("gte.{}", timestamp(since))),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let rows: Vec<serde_json::Value> = check(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;
        Ok(u32::try_from(rows.len()).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl SessionStore for RestStore {
    async fn create_session(&self, session: &NewSession) -> Result<SessionId, PersistenceError> {
        let body = [InsertRow {
            user_id: &self.user.user_id,
            duration: session.duration_seconds,
            completed_duration: 0,
            session_type: session.session_type.as_str(),
            status: SessionStatus::Active.as_str(),
            started_at: timestamp(session.started_at),
            goal_id: session.goal_id.as_deref(),
        }];

        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let rows: Vec<SessionRow> = check(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        rows.first()
            .map(SessionRow::id)
            .ok_or_else(|| PersistenceError::Decode("insert returned no rows".to_string()))
    }

    async fn complete_session(
        &self,
        id: &SessionId,
        completed_duration_seconds: u32,
    ) -> Result<(), PersistenceError> {
        let body = CompleteRow {
            status: SessionStatus::Completed.as_str(),
            completed_duration: completed_duration_seconds,
            completed_at: timestamp(Utc::now()),
        };

        let response = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        check(response).await?;
        Ok(())
    }

    async fn count_completed_work_sessions_today(&self) -> Result<u32, PersistenceError> {
        self.count_completed_work_since(start_of_day(&Local::now()))
            .await
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<FocusSession>, PersistenceError> {
        let response = self
            .request(Method::GET)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", self.user.user_id)),
                ("order", "started_at.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let rows: Vec<SessionRow> = check(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn network_error(e: reqwest::Error) -> PersistenceError {
    PersistenceError::Network(e.to_string())
}

fn decode_error(e: reqwest::Error) -> PersistenceError {
    PersistenceError::Decode(e.to_string())
}

/// Pass successful responses through; map the rest to errors.
async fn check(response: Response) -> Result<Response, PersistenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PersistenceError::Auth(
            if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        )),
        _ => Err(PersistenceError::Backend {
            status: status.as_u16(),
            message: body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, api_key: Option<&str>) -> RestConfig {
        RestConfig {
            url: url.map(str::to_string),
            api_key: api_key.map(str::to_string),
            ..RestConfig::default()
        }
    }

    fn user() -> UserSession {
        UserSession {
            access_token: "token".to_string(),
            user_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_new_requires_url() {
        let err = RestStore::new(&config(None, Some("anon")), user()).unwrap_err();
        assert!(err.to_string().contains("storage.rest.url"));
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = RestStore::new(&config(Some("https://x.test"), None), user()).unwrap_err();
        assert!(err.to_string().contains("storage.rest.api_key"));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let store = RestStore::new(&config(Some("https://x.test/"), Some("anon")), user()).unwrap();
        assert_eq!(store.base_url, "https://x.test");
    }

    #[test]
    fn test_row_with_numeric_id() {
        let row: SessionRow = serde_json::from_value(serde_json::json!({
            "id": 42,
            "session_type": "break",
            "duration": 300,
            "completed_duration": 300,
            "status": "completed",
            "started_at": "2024-01-01T10:00:00+00:00",
            "completed_at": "2024-01-01T10:05:00+00:00"
        }))
        .unwrap();

        let session = row.into_session().unwrap();
        assert_eq!(session.id, Some(SessionId::from("42")));
        assert_eq!(session.session_type, Phase::Break);
        assert_eq!(session.elapsed_seconds, 300);
        assert!(session.completed_at.is_some());
    }

    #[test]
    fn test_row_with_unknown_status() {
        let row: SessionRow = serde_json::from_value(serde_json::json!({
            "id": "a",
            "session_type": "work",
            "duration": 60,
            "status": "abandoned",
            "started_at": "2024-01-01T10:00:00Z"
        }))
        .unwrap();

        assert!(matches!(
            row.into_session(),
            Err(PersistenceError::Decode(_))
        ));
    }
}
