//! Relay config loader (strict parsing).

pub mod schema;

use std::fs;

use roomcast_core::error::{RelayError, Result};

pub use schema::{GatewaySection, RelayConfig, RoomSection};

pub const DEFAULT_PATH: &str = "roomcast.yaml";
pub const PATH_ENV: &str = "ROOMCAST_CONFIG";
pub const LISTEN_ENV: &str = "ROOMCAST_LISTEN";

/// Config path: explicit argument, then `ROOMCAST_CONFIG`, then `roomcast.yaml`.
pub fn resolve_path(arg: Option<String>) -> String {
    arg.or_else(|| std::env::var(PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RelayError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig = serde_yaml::from_str(s)
        .map_err(|e| RelayError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply `ROOMCAST_LISTEN` on top of the file. An unparsable address is rejected.
pub fn apply_env_overrides(cfg: &mut RelayConfig) -> Result<()> {
    apply_listen_override(cfg, std::env::var(LISTEN_ENV).ok())
}

fn apply_listen_override(cfg: &mut RelayConfig, listen: Option<String>) -> Result<()> {
    if let Some(listen) = listen.filter(|l| !l.trim().is_empty()) {
        let previous = std::mem::replace(&mut cfg.gateway.listen, listen);
        if let Err(e) = cfg.gateway.listen_addr() {
            cfg.gateway.listen = previous;
            return Err(e);
        }
        tracing::info!(listen = %cfg.gateway.listen, "listen address overridden from environment");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_override_is_validated() {
        let mut cfg = load_from_str("version: 1\n").unwrap();
        apply_listen_override(&mut cfg, Some("127.0.0.1:9000".into())).unwrap();
        assert_eq!(cfg.gateway.listen, "127.0.0.1:9000");

        let err = apply_listen_override(&mut cfg, Some("not-an-addr".into())).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
        assert_eq!(cfg.gateway.listen, "127.0.0.1:9000");

        apply_listen_override(&mut cfg, Some("  ".into())).unwrap();
    }

    #[test]
    fn explicit_path_wins() {
        assert_eq!(resolve_path(Some("x.yaml".into())), "x.yaml");
    }
}
