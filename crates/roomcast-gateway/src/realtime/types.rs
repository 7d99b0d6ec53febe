use axum::extract::ws::Message;

use roomcast_core::error::Result;
use roomcast_core::protocol::ServerEvent;
use roomcast_core::ConnId;

/// Outbound event serialized once, then enqueued to N recipients.
#[derive(Debug, Clone)]
pub struct PreparedMsg {
    event: &'static str,
    text: String,
}

impl PreparedMsg {
    pub fn prepare(ev: &ServerEvent) -> Result<Self> {
        Ok(Self {
            event: ev.name(),
            text: ev.to_json()?,
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert to axum::ws::Message for transport.
    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.text.clone())
    }
}

/// Delivery capability the broadcaster sends through.
///
/// `send_to` is a non-blocking enqueue. The fan-out helpers isolate
/// per-recipient failures: a recipient that is gone or backed up is skipped
/// and the rest still receive the message.
pub trait Outbox: Send + Sync {
    /// Live connections, in a stable order for a given call.
    fn recipients(&self) -> Vec<ConnId>;

    fn send_to(&self, conn: &ConnId, msg: &PreparedMsg) -> Result<()>;

    /// Returns the number of successful enqueues.
    fn send_to_all(&self, msg: &PreparedMsg) -> usize {
        fan_out(self, self.recipients().iter(), msg)
    }

    /// Everyone except `skip`.
    fn send_to_others(&self, skip: &ConnId, msg: &PreparedMsg) -> usize {
        let targets = self.recipients();
        fan_out(self, targets.iter().filter(|c| *c != skip), msg)
    }
}

fn fan_out<'a, O, I>(outbox: &O, targets: I, msg: &PreparedMsg) -> usize
where
    O: Outbox + ?Sized,
    I: Iterator<Item = &'a ConnId>,
{
    let mut delivered = 0;
    for conn in targets {
        match outbox.send_to(conn, msg) {
            Ok(()) => delivered += 1,
            Err(e) => tracing::debug!(%conn, event = msg.event(), error = %e, "delivery skipped"),
        }
    }
    delivered
}
