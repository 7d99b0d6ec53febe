//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS and assign the connection id
//! - Queue the `hello` greeting, then register the outbound queue in the
//!   session table so no broadcast can reach the client before it
//! - Lifecycle: ping ticker + idle timeout
//! - Decode-once, then hand events to the broadcaster
//! - Report the disconnect to the broadcaster exactly once

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use roomcast_core::error::{ClientCode, RelayError};
use roomcast_core::protocol::ServerEvent;
use roomcast_core::ConnId;

use crate::app_state::AppState;
use crate::realtime::{Connection, Peer, PreparedMsg};
use crate::transport::codec::{decode, Inbound, Limits};

pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    app.metrics().ws_upgrades.inc(&[]);
    ws.on_upgrade(move |socket| async move {
        let id = app.sessions().next_id();
        let span = tracing::info_span!("conn", conn = %id);
        run_session(app, id, socket).instrument(span).await;
    })
}

/// Enqueue a gateway-local event (`hello`, `error`) for this connection only.
fn send_local(tx: &mpsc::Sender<Message>, ev: &ServerEvent) {
    match PreparedMsg::prepare(ev) {
        Ok(p) => {
            if tx.try_send(p.to_ws_message()).is_err() {
                tracing::debug!(event = ev.name(), "local send dropped");
            }
        }
        Err(e) => tracing::error!(event = ev.name(), error = %e, "encode failed"),
    }
}

fn send_error(tx: &mpsc::Sender<Message>, e: &RelayError) {
    send_local(tx, &ServerEvent::error(e.client_code(), e.to_string()));
}

async fn run_session(app: AppState, id: ConnId, socket: WebSocket) {
    let gw = &app.cfg().gateway;
    let limits = Limits::from(&app.cfg().room);

    // ---- outbound queue: `hello` first, then visible to broadcasts
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(gw.outbound_queue);
    send_local(&out_tx, &ServerEvent::hello(id.clone()));
    app.sessions().insert(id.clone(), Connection { tx: out_tx.clone() });
    app.metrics().sessions_active.inc(&[]);
    tracing::debug!("connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut peer = Peer::new(id.clone());

    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let mut ping_tick = tokio::time::interval(Duration::from_millis(gw.ping_interval_ms));
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ping_tick.tick().await;

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                if ws_tx.send(m).await.is_err() {
                    break;
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(Ok(msg)) = incoming else { break; };
                last_activity = Instant::now();

                match decode(msg, limits) {
                    Ok(Inbound::Event(ev)) => {
                        app.metrics().inbound_events.inc(&[("event", ev.name())]);
                        app.broadcaster().handle(&mut peer, ev);
                    }
                    Ok(Inbound::Ping(payload)) => {
                        let _ = out_tx.try_send(Message::Pong(payload));
                    }
                    Ok(Inbound::Pong(_)) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        tracing::debug!(error = %e, "inbound frame rejected");
                        app.metrics().decode_errors.inc(&[("code", e.client_code().as_str())]);
                        send_error(&out_tx, &e);
                    }
                }
            }

            _ = ping_tick.tick() => {
                let _ = out_tx.try_send(Message::Ping(Vec::new()));
            }

            _ = tokio::time::sleep_until(last_activity + idle_timeout) => {
                tracing::debug!("idle timeout");
                if let Ok(text) = ServerEvent::error(ClientCode::Timeout, "idle timeout").to_json() {
                    let _ = ws_tx.send(Message::Text(text)).await;
                }
                break;
            }
        }
    }

    // ---- teardown: leave the session table first so in-flight broadcasts skip us
    app.sessions().remove(&id);
    app.metrics().sessions_active.dec(&[]);
    app.broadcaster().disconnect(&mut peer);
    let _ = ws_tx.close().await;
    tracing::debug!("disconnected");
}
