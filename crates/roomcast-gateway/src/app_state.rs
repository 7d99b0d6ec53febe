//! Shared application state for the relay gateway.
//!
//! Wires the session table, connection registry and broadcaster together so
//! the WebSocket handler and ops endpoints see one consistent runtime.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::obs::metrics::RelayMetrics;
use crate::realtime::{Broadcaster, ConnectionRegistry, Sessions};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: RelayConfig,
    sessions: Arc<Sessions>,
    broadcaster: Arc<Broadcaster>,
    metrics: Arc<RelayMetrics>,
}

impl AppState {
    pub fn new(cfg: RelayConfig) -> Self {
        let metrics = Arc::new(RelayMetrics::default());
        let sessions = Arc::new(Sessions::new(Arc::clone(&metrics)));
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(registry, sessions.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                sessions,
                broadcaster,
                metrics,
            }),
        }
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn sessions(&self) -> &Sessions {
        &self.inner.sessions
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.inner.broadcaster
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Point-in-time gauges that live outside the metrics registry.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("roomcast_online_users", self.broadcaster().registry().len() as u64),
            ("roomcast_connections", self.sessions().len() as u64),
        ]
    }
}
