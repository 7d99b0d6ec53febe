//! Decode-once codec for the transport layer.
//!
//! - Text frames => `ClientEvent` (chat bodies kept as `RawValue`)
//! - Binary frames => rejected, the relay speaks JSON only
//! - Ping/Pong/Close are surfaced for lifecycle management
//!
//! Size is checked before any JSON parsing; display names are validated here
//! (never rewritten) so the broadcaster only ever sees valid names.

use axum::extract::ws::Message;
use roomcast_core::{
    error::{RelayError, Result},
    protocol::{decode_client_event, ClientEvent},
};

use crate::config::RoomSection;

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_frame_bytes: usize,
    pub max_name_bytes: usize,
}

impl From<&RoomSection> for Limits {
    fn from(room: &RoomSection) -> Self {
        Self {
            max_frame_bytes: room.max_frame_bytes,
            max_name_bytes: room.max_name_bytes,
        }
    }
}

#[derive(Debug)]
pub enum Inbound {
    Event(ClientEvent),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

pub fn decode(msg: Message, limits: Limits) -> Result<Inbound> {
    match msg {
        Message::Text(s) => {
            if s.len() > limits.max_frame_bytes {
                return Err(RelayError::PayloadTooLarge);
            }
            let ev = match decode_client_event(&s)? {
                ClientEvent::SetUser { name } => ClientEvent::SetUser {
                    name: validate_name(name, limits.max_name_bytes)?,
                },
                other => other,
            };
            Ok(Inbound::Event(ev))
        }
        Message::Binary(_) => Err(RelayError::BadRequest("binary frames are not supported".into())),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Reject blank or oversized names. Accepted names are returned unchanged.
pub fn validate_name(name: String, max_bytes: usize) -> Result<String> {
    if name.trim().is_empty() {
        return Err(RelayError::BadRequest("name must not be blank".into()));
    }
    if name.len() > max_bytes {
        return Err(RelayError::BadRequest(format!("name longer than {max_bytes} bytes")));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: Limits = Limits {
        max_frame_bytes: 64,
        max_name_bytes: 8,
    };

    #[test]
    fn set_user_name_is_kept_verbatim() {
        let msg = Message::Text(r#"{"event":"set_user","data":" Ann \n"}"#.into());
        match decode(msg, LIMITS).unwrap() {
            Inbound::Event(ClientEvent::SetUser { name }) => assert_eq!(name, " Ann \n"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_names_are_rejected() {
        for data in [r#""""#, r#""   ""#, r#""\t\n""#, r#""abcdefghi""#] {
            let msg = Message::Text(format!(r#"{{"event":"set_user","data":{data}}}"#));
            let err = decode(msg, LIMITS).unwrap_err();
            assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "data={data}");
        }
    }

    #[test]
    fn oversized_frame_is_rejected_before_parsing() {
        let msg = Message::Text(format!("{{{}", "x".repeat(100)));
        let err = decode(msg, LIMITS).unwrap_err();
        assert_eq!(err.client_code().as_str(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn binary_is_rejected() {
        let err = decode(Message::Binary(vec![1, 2, 3]), LIMITS).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }
}
