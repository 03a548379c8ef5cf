// Wire protocol DTOs and conversions for the server's public surface.

use crate::domain::board::{Board, GRID_SIZE, Marker};
use crate::domain::session::{Outcome, SessionSnapshot, SessionStatus};
use serde::{Deserialize, Serialize};

// Status and winner labels are opaque strings agreed at the boundary; clients
// interpret snapshot fields against these, not against behavior.
pub const STATUS_SEARCHING: &str = "Searching for players";
pub const STATUS_IN_PROGRESS: &str = "Game in progress";
pub const STATUS_FINISHED: &str = "Game finished";
pub const WINNER_NONE: &str = "No Winner";
pub const WINNER_TIE: &str = "Tie";

const CELL_EMPTY: &str = "-";

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Assigned identity for the connection.
    Identity { participant_id: String },
    // Snapshot of a session after any state change.
    SessionUpdate(SessionSnapshotDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Queue for a public session.
    FindMatch,
    // Place a marker at the given cell.
    Move(MovePayload),
    // Acknowledge a finished match so the participant can queue again.
    EndGame,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovePayload {
    pub session_id: String,
    pub row: usize,
    pub col: usize,
}

/// Flattened session state for wire transmission.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshotDto {
    pub id: String,
    pub is_private: bool,
    pub participants: Vec<ParticipantDto>,
    // Empty until an opening turn is assigned.
    pub turn: String,
    pub board: Vec<Vec<String>>,
    pub status: String,
    // Empty while unresolved; a participant id, "Tie", or "No Winner" once finished.
    pub winner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDto {
    pub id: String,
    pub marker: String,
}

pub fn marker_label(marker: Marker) -> &'static str {
    match marker {
        Marker::X => "X",
        Marker::O => "O",
    }
}

pub fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Searching => STATUS_SEARCHING,
        SessionStatus::InProgress => STATUS_IN_PROGRESS,
        SessionStatus::Finished => STATUS_FINISHED,
    }
}

fn board_rows(board: &Board) -> Vec<Vec<String>> {
    (0..GRID_SIZE)
        .map(|row| {
            (0..GRID_SIZE)
                .map(|col| match board.cell(row, col).flatten() {
                    Some(marker) => marker_label(marker).to_string(),
                    None => CELL_EMPTY.to_string(),
                })
                .collect()
        })
        .collect()
}

impl From<&SessionSnapshot> for SessionSnapshotDto {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let winner = match &snapshot.outcome {
            Outcome::Unresolved => String::new(),
            Outcome::Winner(id) => id.clone(),
            Outcome::Tie => WINNER_TIE.to_string(),
            Outcome::NoWinner => WINNER_NONE.to_string(),
        };
        Self {
            id: snapshot.id.clone(),
            is_private: snapshot.is_private,
            participants: snapshot
                .participants
                .iter()
                .map(|(id, marker)| ParticipantDto {
                    id: id.clone(),
                    marker: marker_label(*marker).to_string(),
                })
                .collect(),
            turn: snapshot.turn.clone().unwrap_or_default(),
            board: board_rows(&snapshot.board),
            status: status_label(snapshot.status).to_string(),
            winner,
        }
    }
}
