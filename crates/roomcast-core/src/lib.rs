//! roomcast core: transport-agnostic identities, wire events and error types.
//!
//! This crate defines the presence records and the JSON event contracts shared
//! by the gateway and its tests. It carries no transport or runtime
//! dependencies so the same types describe frames on any connection type.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed client frames surface as `RelayError` values, never as crashes.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod user;

/// Shared result type.
pub use error::Result;
pub use error::{ClientCode, RelayError};
pub use user::{ConnId, UserRecord};
