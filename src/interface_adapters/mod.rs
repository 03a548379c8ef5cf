// Interface adapters: wire protocol, network handling, and port implementations.

pub mod http;
pub mod net;
pub mod protocol;
pub mod registry;
pub mod state;
