use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

use roomcast_core::error::{RelayError, Result};
use roomcast_core::ConnId;

use crate::obs::metrics::RelayMetrics;
use crate::realtime::types::{Outbox, PreparedMsg};

/// One connection's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

struct SessionEntry {
    conn: Connection,
    created_seq: u64,
}

/// Session table: `conn_id -> Connection` for every live socket, named or not.
///
/// This is the transport side of the relay; the broadcaster reaches it only
/// through the `Outbox` trait.
pub struct Sessions {
    sessions: DashMap<ConnId, SessionEntry>,
    seq: AtomicU64,
    next_conn: AtomicU64,
    metrics: Arc<RelayMetrics>,
}

impl Sessions {
    pub fn new(metrics: Arc<RelayMetrics>) -> Self {
        Self {
            sessions: DashMap::new(),
            seq: AtomicU64::new(1),
            next_conn: AtomicU64::new(1),
            metrics,
        }
    }

    /// Allocate a fresh connection id (`c-<n>`). Ids are never reused.
    pub fn next_id(&self) -> ConnId {
        ConnId::new(format!("c-{}", self.next_conn.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn insert(&self, id: ConnId, conn: Connection) {
        let created_seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.sessions.insert(id, SessionEntry { conn, created_seq });
    }

    pub fn remove(&self, id: &ConnId) -> Option<Connection> {
        self.sessions.remove(id).map(|(_, entry)| entry.conn)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Outbox for Sessions {
    /// Oldest connection first.
    fn recipients(&self) -> Vec<ConnId> {
        let mut ids: Vec<(u64, ConnId)> = self
            .sessions
            .iter()
            .map(|r| (r.value().created_seq, r.key().clone()))
            .collect();
        ids.sort_unstable_by_key(|(seq, _)| *seq);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn send_to(&self, conn: &ConnId, msg: &PreparedMsg) -> Result<()> {
        let Some(entry) = self.sessions.get(conn) else {
            self.metrics.deliveries_dropped.inc(&[("reason", "gone")]);
            return Err(RelayError::ConnectionGone(conn.to_string()));
        };
        match entry.conn.tx.try_send(msg.to_ws_message()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.metrics.deliveries_dropped.inc(&[("reason", "full")]);
                Err(RelayError::QueueFull(conn.to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                self.metrics.deliveries_dropped.inc(&[("reason", "closed")]);
                Err(RelayError::ConnectionGone(conn.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use roomcast_core::protocol::ServerEvent;

    use super::*;

    fn msg() -> PreparedMsg {
        PreparedMsg::prepare(&ServerEvent::OnlineUsers(Vec::new())).unwrap()
    }

    #[test]
    fn ids_are_unique() {
        let s = Sessions::new(Arc::new(RelayMetrics::default()));
        let a = s.next_id();
        let b = s.next_id();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("c-"));
    }

    #[test]
    fn recipients_in_connect_order() {
        let s = Sessions::new(Arc::new(RelayMetrics::default()));
        let mut rxs = Vec::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let (tx, rx) = mpsc::channel(4);
            let id = s.next_id();
            s.insert(id.clone(), Connection { tx });
            rxs.push(rx);
            ids.push(id);
        }
        assert_eq!(s.recipients(), ids);
    }

    #[test]
    fn failures_are_isolated_and_counted() {
        let metrics = Arc::new(RelayMetrics::default());
        let s = Sessions::new(Arc::clone(&metrics));

        let (full_tx, _full_rx) = mpsc::channel(1);
        let (closed_tx, closed_rx) = mpsc::channel(4);
        let (ok_tx, mut ok_rx) = mpsc::channel(4);
        drop(closed_rx);

        s.insert(ConnId::from("full"), Connection { tx: full_tx });
        s.insert(ConnId::from("closed"), Connection { tx: closed_tx });
        s.insert(ConnId::from("ok"), Connection { tx: ok_tx });

        assert_eq!(s.send_to_all(&msg()), 2);
        assert_eq!(s.send_to_all(&msg()), 1);
        assert!(ok_rx.try_recv().is_ok());
        assert!(ok_rx.try_recv().is_ok());

        assert!(matches!(
            s.send_to(&ConnId::from("gone"), &msg()),
            Err(RelayError::ConnectionGone(_))
        ));

        let text = metrics.render(&[]);
        assert!(text.contains(r#"roomcast_deliveries_dropped_total{reason="closed"} 2"#));
        assert!(text.contains(r#"roomcast_deliveries_dropped_total{reason="full"} 1"#));
        assert!(text.contains(r#"roomcast_deliveries_dropped_total{reason="gone"} 1"#));
    }
}
