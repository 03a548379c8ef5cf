use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::session::{SessionId, SessionSnapshot};

// Port for delivering session snapshots to the transport layer.
pub trait Broadcaster: Send + Sync {
    /// Fire-and-forget delivery of a snapshot to every participant of the
    /// session. Must not block or await confirmation; delivery ordering per
    /// session is preserved by the consumer.
    fn publish(&self, session_id: &str, snapshot: SessionSnapshot);
}

// Port for the connection-to-session assignment map.
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// Current session assignment, or `None` when the participant has no session.
    async fn get(&self, participant_id: &str) -> Option<SessionId>;
    async fn set(&self, participant_id: &str, session_id: Option<SessionId>);
    async fn remove(&self, participant_id: &str);
}

#[async_trait]
impl<T: ParticipantRegistry + ?Sized> ParticipantRegistry for Arc<T> {
    async fn get(&self, participant_id: &str) -> Option<SessionId> {
        (**self).get(participant_id).await
    }

    async fn set(&self, participant_id: &str, session_id: Option<SessionId>) {
        (**self).set(participant_id, session_id).await
    }

    async fn remove(&self, participant_id: &str) {
        (**self).remove(participant_id).await
    }
}
