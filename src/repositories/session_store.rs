use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::SessionState;

/// In-memory store of per-session state. Mutation closures run under the
/// write lock, so no two mutations of any session interleave.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Read a clone of a session's state. Sessions are created by mutation
    /// only; an unknown id reads as `None`.
    pub async fn snapshot(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Run a closure over a session's state under the write lock, creating
    /// the session if absent. Returns the closure's value.
    pub async fn with_session_mut<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionState::new(session_id.to_string()));
        f(session)
    }

    /// Number of sessions currently held
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
