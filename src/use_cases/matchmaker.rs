// Pairing of participants into pending sessions.

use crate::domain::errors::SessionError;
use crate::domain::session::{Session, SessionId, SessionSnapshot};
use rand::Rng;
use std::collections::VecDeque;
use uuid::Uuid;

/// Result of seating a participant in a pending session.
#[derive(Debug)]
pub enum JoinOutcome {
    /// The session still has an open seat; it stays in the pending pool.
    Waiting(SessionSnapshot),
    /// The second seat filled: the session has started and leaves the pool.
    /// The caller owns activation.
    Started(Session),
}

/// In-memory pool of sessions awaiting a second participant. Insertion order
/// is the fill order: the oldest waiting session is matched first.
#[derive(Debug, Default)]
pub struct Matchmaker {
    pending: VecDeque<Session>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Creates an empty pending session and returns its id.
    pub fn create_session(&mut self, is_private: bool) -> SessionId {
        let id = Uuid::new_v4().to_string();
        self.pending.push_back(Session::new(id.clone(), is_private));
        id
    }

    /// Oldest open public session, creating one when none is waiting.
    pub fn find_or_create(&mut self) -> SessionId {
        if let Some(session) = self
            .pending
            .iter()
            .find(|session| !session.is_private && !session.is_full())
        {
            return session.id.clone();
        }
        self.create_session(false)
    }

    /// Seats a participant. When the second seat fills, the session is removed
    /// from the pool, the opening turn is decided by a fair coin flip between
    /// the two seats, and the started session is handed back to the caller.
    pub fn join(
        &mut self,
        session_id: &str,
        participant_id: &str,
    ) -> Result<JoinOutcome, SessionError> {
        let index = self
            .pending
            .iter()
            .position(|session| session.id == session_id)
            .ok_or(SessionError::InvalidSession)?;
        if self.pending[index].is_full() {
            return Err(SessionError::InvalidSession);
        }

        self.pending[index].seat(participant_id.to_string());
        if !self.pending[index].is_full() {
            return Ok(JoinOutcome::Waiting(self.pending[index].snapshot()));
        }

        // NOTE: VecDeque::remove(index) shifts entries after the index; the
        // pool stays small enough that this is not a concern.
        let mut session = self
            .pending
            .remove(index)
            .ok_or(SessionError::InvalidSession)?;

        let slot = if rand::rng().random_bool(0.5) { 0 } else { 1 };
        let opener = session.participants()[slot].0.clone();
        session.start(opener);
        Ok(JoinOutcome::Started(session))
    }

    /// Frees a seat in a pending session. Silent no-op when the session is no
    /// longer pending or the participant never held a seat; the emptied
    /// session stays in the pool for future joiners.
    pub fn leave_pending(&mut self, session_id: &str, participant_id: &str) {
        if let Some(session) = self
            .pending
            .iter_mut()
            .find(|session| session.id == session_id)
        {
            session.unseat(participant_id);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
