//! Shared error type across roomcast crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed frame.
    BadRequest,
    /// Frame exceeds the configured size limit.
    PayloadTooLarge,
    /// Connection idled out.
    Timeout,
    /// Unsupported config or protocol version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON `error` events.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("idle timeout")]
    Timeout,
    #[error("unsupported version")]
    UnsupportedVersion,
    /// Recipient is no longer in the session table.
    #[error("connection gone: {0}")]
    ConnectionGone(String),
    /// Recipient's outbound queue is full or closed.
    #[error("outbound queue full: {0}")]
    QueueFull(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RelayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RelayError::BadRequest(_) => ClientCode::BadRequest,
            RelayError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            RelayError::Timeout => ClientCode::Timeout,
            RelayError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            RelayError::ConnectionGone(_)
            | RelayError::QueueFull(_)
            | RelayError::Internal(_) => ClientCode::Internal,
        }
    }
}
