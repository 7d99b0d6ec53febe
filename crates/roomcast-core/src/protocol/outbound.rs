//! Outbound events (gateway -> client).

use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::{ClientCode, RelayError, Result};
use crate::user::{ConnId, UserRecord};

/// Payload of a relayed chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub sender: UserRecord,
    pub message: Box<RawValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hello {
    pub id: ConnId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub msg: String,
}

/// Events emitted by the gateway.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    UserJoined(UserRecord),
    UserLeft(UserRecord),
    OnlineUsers(Vec<UserRecord>),
    Chatroom(ChatMessage),
    /// Sent once to a fresh connection, never broadcast.
    Hello(Hello),
    /// Sent to the offending connection only.
    Error(ErrorBody),
}

#[derive(Serialize)]
struct Frame<'a, T: Serialize> {
    event: &'static str,
    data: &'a T,
}

impl ServerEvent {
    pub fn hello(id: ConnId) -> Self {
        ServerEvent::Hello(Hello { id })
    }

    pub fn error(code: ClientCode, msg: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorBody {
            code: code.as_str(),
            msg: msg.into(),
        })
    }

    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UserJoined(_) => super::USER_JOINED,
            ServerEvent::UserLeft(_) => super::USER_LEFT,
            ServerEvent::OnlineUsers(_) => super::ONLINE_USERS,
            ServerEvent::Chatroom(_) => super::CHATROOM,
            ServerEvent::Hello(_) => super::HELLO,
            ServerEvent::Error(_) => super::ERROR,
        }
    }

    /// Serialize as `{"event": ..., "data": ...}`.
    pub fn to_json(&self) -> Result<String> {
        let event = self.name();
        let res = match self {
            ServerEvent::UserJoined(r) | ServerEvent::UserLeft(r) => {
                serde_json::to_string(&Frame { event, data: r })
            }
            ServerEvent::OnlineUsers(users) => serde_json::to_string(&Frame { event, data: users }),
            ServerEvent::Chatroom(m) => serde_json::to_string(&Frame { event, data: m }),
            ServerEvent::Hello(h) => serde_json::to_string(&Frame { event, data: h }),
            ServerEvent::Error(e) => serde_json::to_string(&Frame { event, data: e }),
        };
        res.map_err(|e| RelayError::Internal(format!("json encode failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn chat_frame_shape() {
        let ev = ServerEvent::Chatroom(ChatMessage {
            sender: UserRecord::online(ConnId::from("c-7"), "Bob"),
            message: RawValue::from_string(r#""hello""#.to_string()).unwrap(),
        });
        let v: Value = serde_json::from_str(&ev.to_json().unwrap()).unwrap();
        assert_eq!(
            v,
            json!({
                "event": "chatroom",
                "data": {
                    "sender": {"id": "c-7", "name": "Bob", "online": true},
                    "message": "hello"
                }
            })
        );
    }

    #[test]
    fn empty_online_users_is_an_array() {
        let s = ServerEvent::OnlineUsers(Vec::new()).to_json().unwrap();
        assert_eq!(s, r#"{"event":"online_users","data":[]}"#);
    }
}
