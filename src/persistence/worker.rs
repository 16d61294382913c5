//! Background persistence worker.
//!
//! Requests are handled one at a time in the order they were submitted, so a
//! session's completion is always applied after its creation. There is no
//! retry: a failed call is logged, reported as a notice and forgotten.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::{PersistenceHandle, PersistenceNotice, PersistenceRequest, SessionStore};
use crate::focus::{SessionId, SessionKey};

/// Performs persistence requests against a store.
pub struct PersistenceWorker {
    store: Arc<dyn SessionStore>,
    notices: UnboundedSender<PersistenceNotice>,
    ids: HashMap<SessionKey, SessionId>,
}

impl PersistenceWorker {
    /// Create a worker reporting on `notices`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, notices: UnboundedSender<PersistenceNotice>) -> Self {
        Self {
            store,
            notices,
            ids: HashMap::new(),
        }
    }

    /// Spawn a worker task and return the handle that feeds it.
    ///
    /// The task ends once every clone of the handle is dropped and the queue
    /// is drained.
    pub fn spawn(
        store: Arc<dyn SessionStore>,
        notices: UnboundedSender<PersistenceNotice>,
    ) -> (PersistenceHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self::new(store, notices);
        let task = tokio::spawn(worker.run(rx));
        (PersistenceHandle::new(tx), task)
    }

    /// Handle requests until the channel closes.
    pub async fn run(mut self, mut requests: UnboundedReceiver<PersistenceRequest>) {
        while let Some(request) = requests.recv().await {
            self.handle(request).await;
        }
        if !self.ids.is_empty() {
            tracing::debug!(
                open = self.ids.len(),
                "persistence worker stopping with unfinished sessions"
            );
        }
    }

    /// Perform a single request.
    pub async fn handle(&mut self, request: PersistenceRequest) {
        match request {
            PersistenceRequest::Create { key, session } => {
                match self.store.create_session(&session).await {
                    Ok(id) => {
                        tracing::info!(%key, %id, phase = session.session_type.as_str(), "session saved");
                        self.ids.insert(key, id.clone());
                        self.notify(PersistenceNotice::Created { key, id });
                    }
                    Err(e) => {
                        tracing::warn!(%key, error = %e, "failed to save new session");
                        self.notify(PersistenceNotice::Failed {
                            operation: "create",
                            message: e.to_string(),
                        });
                    }
                }
            }
            PersistenceRequest::Complete {
                key,
                completed_duration_seconds,
            } => {
                let Some(id) = self.ids.remove(&key) else {
                    tracing::warn!(%key, "completed session was never saved; skipping update");
                    return;
                };
                match self
                    .store
                    .complete_session(&id, completed_duration_seconds)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(%id, completed_duration_seconds, "session marked completed");
                    }
                    Err(e) => {
                        tracing::warn!(%id, error = %e, "failed to mark session completed");
                        self.notify(PersistenceNotice::Failed {
                            operation: "complete",
                            message: e.to_string(),
                        });
                    }
                }
            }
            PersistenceRequest::Release { key } => {
                if let Some(id) = self.ids.remove(&key) {
                    tracing::debug!(%key, %id, "session discarded before completion");
                }
            }
        }
    }

    /// Number of sessions created but not yet completed or released.
    #[cfg(test)]
    fn open_sessions(&self) -> usize {
        self.ids.len()
    }

    fn notify(&self, notice: PersistenceNotice) {
        // Nobody listening is fine; the UI may already be gone.
        let _ = self.notices.send(notice);
    }
}
