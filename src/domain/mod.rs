// Domain layer: board rules, session state, and outward-facing ports.

pub mod board;
pub mod errors;
pub mod ports;
pub mod session;

pub use board::{Board, GRID_SIZE, Marker};
pub use errors::SessionError;
pub use session::{
    MAX_PARTICIPANTS, Outcome, ParticipantId, Session, SessionId, SessionSnapshot, SessionStatus,
};
