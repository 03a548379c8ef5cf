// Use cases layer: matchmaking and session dispatch workflows.

pub mod directory;
pub mod matchmaker;

pub use directory::SessionDirectory;
pub use matchmaker::{JoinOutcome, Matchmaker};
