// In-memory connection-to-session assignment map.

use crate::domain::ports::ParticipantRegistry;
use crate::domain::session::SessionId;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Tracks which session, if any, each connected participant belongs to.
/// Never inspects session internals; the directory owns those.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    assignments: Mutex<HashMap<String, Option<SessionId>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryRegistry {
    async fn get(&self, participant_id: &str) -> Option<SessionId> {
        self.assignments
            .lock()
            .await
            .get(participant_id)
            .cloned()
            .flatten()
    }

    async fn set(&self, participant_id: &str, session_id: Option<SessionId>) {
        self.assignments
            .lock()
            .await
            .insert(participant_id.to_string(), session_id);
    }

    async fn remove(&self, participant_id: &str) {
        self.assignments.lock().await.remove(participant_id);
    }
}
