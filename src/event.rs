//! Event — the named wire message for relaychat.
//!
//! DESIGN
//! ======
//! Every communication between clients and the relay is an Event: a name,
//! a millisecond timestamp, and a flat string-keyed payload. Clients send
//! request events over WebSocket text frames, the router dispatches on
//! `name`, and outbound events flow back the same way.
//!
//! - Flat data: payload is always `Map<String, Value>`, never nested types.
//! - No request/response correlation: the relay is fire-and-forget, so
//!   events carry no parent IDs and no status lifecycle.
//! - Inbound payloads are untrusted; accessors return `Option` and callers
//!   treat missing or mistyped fields as a no-op.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// =============================================================================
// TYPES
// =============================================================================

/// Flat key-value payload. Alias to reduce noise in signatures.
pub type Data = HashMap<String, serde_json::Value>;

/// The universal message type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Milliseconds since Unix epoch. Set automatically at construction;
    /// inbound events may omit it (clients are not trusted for time).
    #[serde(default)]
    pub ts: i64,
    #[serde(default)]
    pub data: Data,
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// Current time as milliseconds since Unix epoch.
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl Event {
    /// Create an event with an empty payload.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ts: now_ms(), data: Data::new() }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// PAYLOAD ACCESSORS
// =============================================================================

impl Event {
    /// Read a string field from the payload.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
