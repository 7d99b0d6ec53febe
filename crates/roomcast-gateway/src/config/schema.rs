use std::net::SocketAddr;

use serde::Deserialize;
use roomcast_core::error::{RelayError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub room: RoomSection,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RelayError::UnsupportedVersion);
        }
        self.gateway.validate()?;
        self.room.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Per-connection outbound queue capacity (messages).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl GatewaySection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| RelayError::BadRequest(format!("gateway.listen is not a socket address: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(RelayError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(RelayError::BadRequest(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(RelayError::BadRequest(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(16..=65536).contains(&self.outbound_queue) {
            return Err(RelayError::BadRequest(
                "gateway.outbound_queue must be between 16 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_outbound_queue() -> usize {
    1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomSection {
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    #[serde(default = "default_max_name_bytes")]
    pub max_name_bytes: usize,
}

impl Default for RoomSection {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            max_name_bytes: default_max_name_bytes(),
        }
    }
}

impl RoomSection {
    pub fn validate(&self) -> Result<()> {
        if !(256..=1_048_576).contains(&self.max_frame_bytes) {
            return Err(RelayError::BadRequest(
                "room.max_frame_bytes must be between 256 and 1048576".into(),
            ));
        }
        if !(1..=256).contains(&self.max_name_bytes) {
            return Err(RelayError::BadRequest(
                "room.max_name_bytes must be between 1 and 256".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_frame_bytes() -> usize {
    8192
}
fn default_max_name_bytes() -> usize {
    64
}
