//! Realtime core components for the relay.
//!
//! Presence registry, the event broadcaster, and the live session table that
//! serves as the broadcaster's outbox.

mod broadcaster;
mod registry;
mod sessions;

pub use broadcaster::{Broadcaster, ConnState, Peer};
pub use registry::ConnectionRegistry;
pub use sessions::{Connection, Sessions};
