use std::sync::{Arc, Mutex, PoisonError};

use serde_json::value::RawValue;

use roomcast_core::protocol::{ChatMessage, ClientEvent, ServerEvent};
use roomcast_core::{ConnId, UserRecord};

use crate::realtime::core::ConnectionRegistry;
use crate::realtime::types::{Outbox, PreparedMsg};

/// Lifecycle of one connection as seen by the broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Connected, never named.
    Anonymous,
    /// Has a registry entry.
    Named,
    /// Disconnected. Terminal.
    Closed,
}

/// Broadcaster-side handle of one connection, owned by its session task.
#[derive(Debug)]
pub struct Peer {
    id: ConnId,
    state: ConnState,
}

impl Peer {
    pub fn new(id: ConnId) -> Self {
        Self {
            id,
            state: ConnState::Anonymous,
        }
    }

    pub fn id(&self) -> &ConnId {
        &self.id
    }

    pub fn state(&self) -> ConnState {
        self.state
    }
}

/// Turns connection events into registry mutations and outbound fan-out.
///
/// Each event's mutate/snapshot/send sequence runs under `emit`, so every
/// recipient sees membership broadcasts in the order the registry changed.
/// Sends are non-blocking enqueues; nothing here awaits.
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    outbox: Arc<dyn Outbox>,
    emit: Mutex<()>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            registry,
            outbox,
            emit: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn handle(&self, peer: &mut Peer, ev: ClientEvent) {
        match ev {
            ClientEvent::SetUser { name } => {
                self.set_user(peer, name);
            }
            ClientEvent::Chatroom { message } => {
                self.chatroom(peer, message);
            }
        }
    }

    /// Register (or rename) the peer, then announce it and the new roster to everyone.
    pub fn set_user(&self, peer: &mut Peer, name: String) -> Option<UserRecord> {
        if peer.state == ConnState::Closed {
            tracing::debug!(conn = %peer.id, "set_user after disconnect ignored");
            return None;
        }

        let _g = self.emit.lock().unwrap_or_else(PoisonError::into_inner);
        let record = self.registry.register(peer.id.clone(), name);
        let renamed = peer.state == ConnState::Named;
        peer.state = ConnState::Named;

        if renamed {
            tracing::info!(conn = %peer.id, name = %record.name, "user renamed");
        } else {
            tracing::info!(conn = %peer.id, name = %record.name, "user joined");
        }

        self.broadcast(&ServerEvent::UserJoined(record.clone()));
        self.broadcast_online_users();
        Some(record)
    }

    /// Relay a chat message to every connection exactly once.
    ///
    /// Others are served first, then the sender gets its own copy. Returns the
    /// number of deliveries, or 0 when the peer has no registry entry.
    pub fn chatroom(&self, peer: &Peer, message: Box<RawValue>) -> usize {
        if peer.state == ConnState::Closed {
            return 0;
        }

        let _g = self.emit.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = self.registry.get(&peer.id) else {
            return 0;
        };

        let ev = ServerEvent::Chatroom(ChatMessage { sender, message });
        let Some(prepared) = prepare(&ev) else {
            return 0;
        };

        let mut delivered = self.outbox.send_to_others(&peer.id, &prepared);
        match self.outbox.send_to(&peer.id, &prepared) {
            Ok(()) => delivered += 1,
            Err(e) => tracing::debug!(conn = %peer.id, error = %e, "chat echo skipped"),
        }
        delivered
    }

    /// Terminal transition. Announces the departure only if the peer was named.
    pub fn disconnect(&self, peer: &mut Peer) -> Option<UserRecord> {
        if peer.state == ConnState::Closed {
            return None;
        }
        peer.state = ConnState::Closed;

        let _g = self.emit.lock().unwrap_or_else(PoisonError::into_inner);
        let record = self.registry.unregister(&peer.id)?;
        tracing::info!(conn = %peer.id, name = %record.name, "user left");

        self.broadcast(&ServerEvent::UserLeft(record.clone()));
        self.broadcast_online_users();
        Some(record)
    }

    fn broadcast_online_users(&self) {
        self.broadcast(&ServerEvent::OnlineUsers(self.registry.snapshot()));
    }

    fn broadcast(&self, ev: &ServerEvent) {
        if let Some(prepared) = prepare(ev) {
            let n = self.outbox.send_to_all(&prepared);
            tracing::debug!(event = ev.name(), recipients = n, "broadcast");
        }
    }
}

fn prepare(ev: &ServerEvent) -> Option<PreparedMsg> {
    match PreparedMsg::prepare(ev) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::error!(event = ev.name(), error = %e, "encode failed");
            None
        }
    }
}
