//! Connection identities and presence records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque per-connection identifier assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnId(String);

impl ConnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Presence state of one named connection.
///
/// `online` is always `true` while the record is registered; offline users are
/// removed rather than flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: ConnId,
    pub name: String,
    pub online: bool,
}

impl UserRecord {
    pub fn online(id: ConnId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            online: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_flat() {
        let r = UserRecord::online(ConnId::from("c-1"), "Alice");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({"id": "c-1", "name": "Alice", "online": true}));
    }
}
