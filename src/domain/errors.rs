// Domain-level errors for matchmaking and move processing.
// All variants are recoverable and caller-local: the operation is rejected
// with no state change and no broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The referenced session is not in the pending pool (or is already full).
    InvalidSession,
    /// The referenced session is not in the active set.
    UnknownSession,
    NotYourTurn,
    CellOccupied,
    OutOfBounds,
    /// The participant is already assigned to a session.
    AlreadyInSession,
}
