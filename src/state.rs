//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the connection registry for the single chat room and the AI
//! responder. The registry is the only shared mutable state in the relay;
//! the websocket router is its sole mutator and every mutation completes
//! inside one write-lock acquisition, so events never interleave their
//! registry updates. No lock is held across an await of external work.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::event::Event;
use crate::services::ai::AiResponder;

// =============================================================================
// PARTICIPANT
// =============================================================================

/// Registered identity for one live connection. Fields are immutable after
/// registration; a re-join replaces the whole entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub color: String,
    /// Milliseconds since Unix epoch, captured at join.
    pub joined_at: i64,
}

// =============================================================================
// ROOM STATE
// =============================================================================

/// In-memory connection registry for the chat room. No persistence: an
/// entry lives exactly as long as its connection.
pub struct RoomState {
    /// Joined participants keyed by connection ID.
    pub participants: HashMap<Uuid, Participant>,
    /// Connected clients: `client_id` -> sender for outgoing events.
    /// A connection appears here from upgrade until close, whether or not
    /// it has joined.
    pub clients: HashMap<Uuid, mpsc::Sender<Event>>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self { participants: HashMap::new(), clients: HashMap::new() }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<RwLock<RoomState>>,
    /// AI responder capability. The disabled variant answers every prompt
    /// with the fallback message, so the relay runs without credentials.
    pub responder: Arc<AiResponder>,
}

impl AppState {
    #[must_use]
    pub fn new(responder: Arc<AiResponder>) -> Self {
        Self { room: Arc::new(RwLock::new(RoomState::new())), responder }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
