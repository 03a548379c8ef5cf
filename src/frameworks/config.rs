use std::env;

// Runtime/server constants (not game rules).

pub fn http_port() -> u16 {
    env::var("TICTACTOE_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

// Snapshots queued between the core and the fan-out task.
pub const BROADCAST_CHANNEL_CAPACITY: usize = 256;
