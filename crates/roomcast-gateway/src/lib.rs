//! roomcast gateway library entry.
//!
//! Wires the WebSocket transport, the presence registry and the broadcaster
//! into one relay. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod transport;
