// Session state: participants, turn ownership, lifecycle, and outcome.

use crate::domain::board::{Board, Marker};

pub type SessionId = String;
pub type ParticipantId = String;

pub const MAX_PARTICIPANTS: usize = 2;

/// Lifecycle of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Searching,
    InProgress,
    Finished,
}

/// Result of a finished match. `NoWinner` marks an abrupt termination
/// (a participant left mid-game), distinct from a full-board `Tie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unresolved,
    Winner(ParticipantId),
    Tie,
    NoWinner,
}

/// One match instance. Participants are kept as an explicit insertion-ordered
/// pair of seats; turn assignment and toggling never rely on map key order.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub is_private: bool,
    participants: Vec<(ParticipantId, Marker)>,
    pub turn: Option<ParticipantId>,
    pub board: Board,
    pub status: SessionStatus,
    pub outcome: Outcome,
}

impl Session {
    pub fn new(id: SessionId, is_private: bool) -> Self {
        Self {
            id,
            is_private,
            participants: Vec::with_capacity(MAX_PARTICIPANTS),
            turn: None,
            board: Board::new(),
            status: SessionStatus::Searching,
            outcome: Outcome::Unresolved,
        }
    }

    pub fn participants(&self) -> &[(ParticipantId, Marker)] {
        &self.participants
    }

    pub fn seat_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    pub fn marker_of(&self, participant_id: &str) -> Option<Marker> {
        self.participants
            .iter()
            .find(|(id, _)| id == participant_id)
            .map(|(_, marker)| *marker)
    }

    /// Seats a participant and returns their marker. The first occupant always
    /// receives X; a later joiner receives the complement of whatever the
    /// current occupant holds, which covers a stale single-occupant session
    /// left behind by an early departure. Callers check `is_full` first.
    pub fn seat(&mut self, participant_id: ParticipantId) -> Marker {
        let marker = match self.participants.first() {
            None => Marker::X,
            Some((_, taken)) => taken.other(),
        };
        self.participants.push((participant_id, marker));
        marker
    }

    /// Frees a seat if the participant holds one; no-op otherwise.
    pub fn unseat(&mut self, participant_id: &str) {
        self.participants.retain(|(id, _)| id != participant_id);
    }

    /// Starts the match with the given opening turn.
    pub fn start(&mut self, first_turn: ParticipantId) {
        self.status = SessionStatus::InProgress;
        self.turn = Some(first_turn);
    }

    /// Hands the turn to the seat the mover does not occupy. Meaningful only
    /// with both seats filled, which holds whenever a move is accepted.
    pub fn advance_turn(&mut self, mover: &str) {
        if let [(first, _), (second, _)] = self.participants.as_slice() {
            let next = if first == mover { second } else { first };
            self.turn = Some(next.clone());
        }
    }

    /// Terminal transition; a session that is already finished stays as it is.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.status == SessionStatus::Finished {
            return;
        }
        self.status = SessionStatus::Finished;
        self.outcome = outcome;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            is_private: self.is_private,
            participants: self.participants.clone(),
            turn: self.turn.clone(),
            board: self.board.clone(),
            status: self.status,
            outcome: self.outcome.clone(),
        }
    }
}

/// Full externally visible state of a session, published after every change.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub is_private: bool,
    pub participants: Vec<(ParticipantId, Marker)>,
    pub turn: Option<ParticipantId>,
    pub board: Board,
    pub status: SessionStatus,
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seat_always_receives_x() {
        let mut session = Session::new("s1".into(), false);
        assert_eq!(session.seat("p1".into()), Marker::X);
        assert_eq!(session.seat("p2".into()), Marker::O);
    }

    #[test]
    fn reseated_session_still_hands_out_x_first() {
        // A sole occupant leaves; the next joiner must get X, not O.
        let mut session = Session::new("s1".into(), false);
        session.seat("p1".into());
        session.unseat("p1");
        assert_eq!(session.seat_count(), 0);
        assert_eq!(session.seat("p3".into()), Marker::X);
    }

    #[test]
    fn second_seat_complements_a_stale_occupant() {
        let mut session = Session::new("s1".into(), false);
        session.seat("p1".into());
        session.seat("p2".into());
        session.unseat("p1");
        // p2 holds O, so the newcomer gets X even though they join second.
        assert_eq!(session.marker_of("p2"), Some(Marker::O));
        assert_eq!(session.seat("p3".into()), Marker::X);
    }

    #[test]
    fn turn_toggles_between_the_two_seats() {
        let mut session = Session::new("s1".into(), false);
        session.seat("p1".into());
        session.seat("p2".into());
        session.start("p1".into());

        session.advance_turn("p1");
        assert_eq!(session.turn.as_deref(), Some("p2"));
        session.advance_turn("p2");
        assert_eq!(session.turn.as_deref(), Some("p1"));
    }

    #[test]
    fn finish_is_terminal() {
        let mut session = Session::new("s1".into(), false);
        session.seat("p1".into());
        session.seat("p2".into());
        session.start("p1".into());

        session.finish(Outcome::Tie);
        session.finish(Outcome::NoWinner);
        assert_eq!(session.status, SessionStatus::Finished);
        assert_eq!(session.outcome, Outcome::Tie);
    }
}
