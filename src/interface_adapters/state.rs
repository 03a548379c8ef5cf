use crate::interface_adapters::net::{ChannelBroadcaster, ConnectionTable};
use crate::interface_adapters::registry::InMemoryRegistry;
use crate::use_cases::SessionDirectory;
use std::sync::Arc;

/// Concrete directory wiring used by the running server.
pub type Directory = SessionDirectory<ChannelBroadcaster, Arc<InMemoryRegistry>>;

pub struct AppState {
    // Single owner of all session state.
    pub directory: Arc<Directory>,
    // Connection-to-session assignments, shared with the directory.
    pub registry: Arc<InMemoryRegistry>,
    // Outbound delivery routes for connected clients.
    pub connections: Arc<ConnectionTable>,
}
