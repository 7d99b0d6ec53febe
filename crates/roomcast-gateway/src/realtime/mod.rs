//! Realtime runtime for the relay.
//!
//! ConnectionRegistry + Broadcaster + the session table they deliver through.

pub mod core;
pub mod types;

pub use core::{Broadcaster, ConnState, Connection, ConnectionRegistry, Peer, Sessions};
pub use types::{Outbox, PreparedMsg};
