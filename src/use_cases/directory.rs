// Session directory: routes match/move/disconnect requests to sessions and
// publishes a snapshot after every state change.

use crate::domain::errors::SessionError;
use crate::domain::ports::{Broadcaster, ParticipantRegistry};
use crate::domain::session::{Outcome, Session, SessionId, SessionStatus};
use crate::use_cases::matchmaker::{JoinOutcome, Matchmaker};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

// Pending pool plus active set, guarded together by one coarse lock. Session
// operations are short and never block, so a single lock keeps the
// pending-to-active promotion atomic without per-session bookkeeping.
#[derive(Debug, Default)]
struct DirectoryState {
    matchmaker: Matchmaker,
    active: HashMap<SessionId, Session>,
}

/// Owns every session instance and the only mutable paths into them.
pub struct SessionDirectory<B, R> {
    state: Mutex<DirectoryState>,
    broadcaster: B,
    registry: R,
}

impl<B, R> SessionDirectory<B, R>
where
    B: Broadcaster,
    R: ParticipantRegistry,
{
    pub fn new(broadcaster: B, registry: R) -> Self {
        Self {
            state: Mutex::new(DirectoryState::default()),
            broadcaster,
            registry,
        }
    }

    /// Places the participant into the oldest open public session, creating
    /// one when none is waiting. Publishes the resulting snapshot exactly once
    /// whether the session is still waiting or has just started.
    pub async fn request_match(&self, participant_id: &str) -> Result<SessionId, SessionError> {
        if self.registry.get(participant_id).await.is_some() {
            return Err(SessionError::AlreadyInSession);
        }

        let session_id = {
            let mut state = self.state.lock().await;
            let session_id = state.matchmaker.find_or_create();
            match state.matchmaker.join(&session_id, participant_id)? {
                JoinOutcome::Waiting(snapshot) => {
                    debug!(%session_id, participant_id, "participant waiting for opponent");
                    self.broadcaster.publish(&session_id, snapshot);
                }
                JoinOutcome::Started(session) => {
                    info!(%session_id, "session started");
                    let snapshot = session.snapshot();
                    state.active.insert(session.id.clone(), session);
                    self.broadcaster.publish(&session_id, snapshot);
                }
            }
            session_id
        };

        self.registry
            .set(participant_id, Some(session_id.clone()))
            .await;
        Ok(session_id)
    }

    /// Validates and applies one move. A rejection changes nothing and
    /// publishes nothing; a success writes exactly one cell, toggles the turn,
    /// resolves the outcome, and publishes exactly one snapshot. A session
    /// that finished leaves the active set right after its final snapshot.
    pub async fn submit_move(
        &self,
        session_id: &str,
        participant_id: &str,
        row: usize,
        col: usize,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let session = state
            .active
            .get_mut(session_id)
            .ok_or(SessionError::UnknownSession)?;

        if session.turn.as_deref() != Some(participant_id) {
            return Err(SessionError::NotYourTurn);
        }
        let cell = session.board.cell(row, col).ok_or(SessionError::OutOfBounds)?;
        if cell.is_some() {
            return Err(SessionError::CellOccupied);
        }
        let marker = session
            .marker_of(participant_id)
            .ok_or(SessionError::NotYourTurn)?;

        session.board.place(row, col, marker);
        session.advance_turn(participant_id);

        if session.board.has_won(marker) {
            session.finish(Outcome::Winner(participant_id.to_string()));
        } else if session.board.is_full() {
            session.finish(Outcome::Tie);
        }

        let snapshot = session.snapshot();
        let finished = session.status == SessionStatus::Finished;
        self.broadcaster.publish(session_id, snapshot);

        if finished {
            state.active.remove(session_id);
            info!(%session_id, "session finished");
        }
        Ok(())
    }

    /// Forced termination with no winner, used when a participant leaves
    /// mid-game. Idempotent: unknown or already-finished ids are a no-op.
    /// The snapshot does not identify who left.
    pub async fn abrupt_end(&self, session_id: &str) {
        let mut state = self.state.lock().await;
        end_active(&mut state, &self.broadcaster, session_id);
    }

    /// Resolves what the departing participant was doing and cleans up:
    /// an active session ends with no winner, a pending seat is freed, and
    /// the registry entry is dropped either way.
    pub async fn notify_disconnect(&self, participant_id: &str) {
        if let Some(session_id) = self.registry.get(participant_id).await {
            let mut state = self.state.lock().await;
            if !end_active(&mut state, &self.broadcaster, &session_id) {
                state.matchmaker.leave_pending(&session_id, participant_id);
            }
        }
        self.registry.remove(participant_id).await;
    }

    /// Client acknowledgement that its match is over; only the registry
    /// assignment is reset so the participant can queue again.
    pub async fn clear_assignment(&self, participant_id: &str) {
        self.registry.set(participant_id, None).await;
    }
}

// Finishes and removes an active session; false when the id is not active.
fn end_active<B: Broadcaster>(
    state: &mut DirectoryState,
    broadcaster: &B,
    session_id: &str,
) -> bool {
    let Some(mut session) = state.active.remove(session_id) else {
        return false;
    };
    session.finish(Outcome::NoWinner);
    broadcaster.publish(session_id, session.snapshot());
    info!(%session_id, "session ended abruptly");
    true
}
