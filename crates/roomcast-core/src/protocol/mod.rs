//! Wire protocol: named JSON events over text frames.
//!
//! Every frame is an object `{"event": <name>, "data": <payload>}`:
//! - Inbound (`inbound`): `set_user` and `chatroom`, decoded once per frame.
//! - Outbound (`outbound`): presence and chat events emitted by the gateway.
//!
//! Chat bodies are kept as `RawValue` so they are relayed byte-for-byte
//! without ever being interpreted by the server.

pub mod inbound;
pub mod outbound;

pub use inbound::{decode_client_event, ClientEvent};
pub use outbound::{ChatMessage, ServerEvent};

pub const SET_USER: &str = "set_user";
pub const CHATROOM: &str = "chatroom";
pub const USER_JOINED: &str = "user_joined";
pub const USER_LEFT: &str = "user_left";
pub const ONLINE_USERS: &str = "online_users";
pub const HELLO: &str = "hello";
pub const ERROR: &str = "error";
