//! Inbound frames (client -> gateway).

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::error::{RelayError, Result};

/// Raw inbound frame. `data` stays unparsed until the event name is known.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Frame {
    event: String,
    /// `None` only when the key is absent; an explicit `null` is kept raw.
    #[serde(default, deserialize_with = "present")]
    data: Option<Box<RawValue>>,
}

fn present<'de, D>(d: D) -> std::result::Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(d).map(Some)
}

/// A decoded client event.
#[derive(Debug)]
pub enum ClientEvent {
    /// Register or rename this connection.
    SetUser { name: String },
    /// Chat body, opaque to the server.
    Chatroom { message: Box<RawValue> },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::SetUser { .. } => super::SET_USER,
            ClientEvent::Chatroom { .. } => super::CHATROOM,
        }
    }
}

/// Decode one text frame into a client event.
pub fn decode_client_event(text: &str) -> Result<ClientEvent> {
    let frame: Frame = serde_json::from_str(text)
        .map_err(|e| RelayError::BadRequest(format!("invalid frame json: {e}")))?;

    match frame.event.as_str() {
        super::SET_USER => {
            let raw = frame
                .data
                .ok_or_else(|| RelayError::BadRequest("set_user requires data".into()))?;
            let name: String = serde_json::from_str(raw.get())
                .map_err(|_| RelayError::BadRequest("set_user data must be a string".into()))?;
            Ok(ClientEvent::SetUser { name })
        }
        super::CHATROOM => {
            let message = frame
                .data
                .ok_or_else(|| RelayError::BadRequest("chatroom requires data".into()))?;
            Ok(ClientEvent::Chatroom { message })
        }
        other => Err(RelayError::BadRequest(format!("unknown event: {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_is_kept_verbatim() {
        let ev = decode_client_event(r#"{"event":"chatroom","data":{"text":"hi",  "n":1}}"#).unwrap();
        match ev {
            ClientEvent::Chatroom { message } => assert_eq!(message.get(), r#"{"text":"hi",  "n":1}"#),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn null_chat_body_is_relayed_not_missing() {
        match decode_client_event(r#"{"event":"chatroom","data":null}"#).unwrap() {
            ClientEvent::Chatroom { message } => assert_eq!(message.get(), "null"),
            other => panic!("unexpected {other:?}"),
        }
        let err = decode_client_event(r#"{"event":"set_user","data":null}"#).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn set_user_requires_string() {
        let err = decode_client_event(r#"{"event":"set_user","data":42}"#).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }
}
