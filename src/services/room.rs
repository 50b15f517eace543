//! Room service — connection registry operations and broadcast fan-out.
//!
//! DESIGN
//! ======
//! The registry distinguishes *connected* from *joined*: a connection gets a
//! sender slot at upgrade time, but only becomes a participant once it sends
//! a join event with a display name. Events that require an identity are
//! dropped for connections that never joined.
//!
//! Registry mutations happen inside a single write-lock acquisition each, so
//! two events can never interleave their updates. Broadcasts take the read
//! lock and `try_send` a clone per recipient — full channels and closed
//! connections are skipped, which is the whole delivery guarantee.

use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::event::{Event, now_ms};
use crate::palette;
use crate::state::{AppState, Participant};

// =============================================================================
// CONNECT / DISCONNECT
// =============================================================================

/// Track a freshly upgraded connection so broadcasts can reach it.
pub async fn connect(state: &AppState, client_id: Uuid, tx: mpsc::Sender<Event>) {
    let mut room = state.room.write().await;
    room.clients.insert(client_id, tx);
    info!(%client_id, connections = room.clients.len(), "connection tracked");
}

/// Drop a closed connection. Returns the removed participant and the
/// remaining participant count when the connection had joined.
pub async fn disconnect(state: &AppState, client_id: Uuid) -> Option<(Participant, usize)> {
    let mut room = state.room.write().await;
    room.clients.remove(&client_id);
    let removed = room.participants.remove(&client_id);
    info!(%client_id, remaining = room.participants.len(), "connection dropped");
    removed.map(|participant| (participant, room.participants.len()))
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Register a participant for a connection. The color is assigned from the
/// current registry size, so the k-th join receives `PALETTE[k % len]`.
///
/// Calling this twice for the same connection overwrites the existing entry
/// (and may assign a new color) — idempotent overwrite is the contract.
pub async fn register(state: &AppState, client_id: Uuid, name: &str) -> (Participant, usize) {
    let mut room = state.room.write().await;
    let color = palette::assign(room.participants.len());
    let participant = Participant { name: name.to_owned(), color: color.to_owned(), joined_at: now_ms() };
    room.participants.insert(client_id, participant.clone());
    info!(%client_id, name, color, count = room.participants.len(), "participant registered");
    (participant, room.participants.len())
}

/// Look up the participant for a connection. `None` means "not joined" and
/// callers treat it as a signal to drop the event.
pub async fn lookup(state: &AppState, client_id: Uuid) -> Option<Participant> {
    let room = state.room.read().await;
    room.participants.get(&client_id).cloned()
}

/// Current participant count.
pub async fn participant_count(state: &AppState) -> usize {
    let room = state.room.read().await;
    room.participants.len()
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Broadcast an event to every connected client, optionally excluding one.
pub async fn broadcast(state: &AppState, event: &Event, exclude: Option<Uuid>) {
    let room = state.room.read().await;
    for (client_id, tx) in &room.clients {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: if a client's channel is full or closed, skip it.
        let _ = tx.try_send(event.clone());
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
