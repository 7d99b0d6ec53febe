//! roomcast gateway binary.
//!
//! - WebSocket endpoint: /v1/ws
//! - Ops: /healthz, /readyz, /metrics
//! - Config: `roomcast.yaml` (or argv[1] / ROOMCAST_CONFIG), ROOMCAST_LISTEN override

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use roomcast_core::error::{RelayError, Result};
use roomcast_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "roomcast-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::resolve_path(std::env::args().nth(1));
    let mut cfg = config::load_from_file(&path)?;
    config::apply_env_overrides(&mut cfg)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = AppState::new(cfg);
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "roomcast-gateway starting");
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| RelayError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| RelayError::Internal(format!("server failed: {e}")))?;

    tracing::info!("roomcast-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    state.metrics().set_draining();
    tracing::info!("draining");
}
