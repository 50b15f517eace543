//! WebSocket handler — the event router and broadcast dispatch.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client events → parse + dispatch by event name
//! - Broadcast events from peers → forward to client
//!
//! Handler functions are pure business logic — they validate, mutate the
//! registry, and return a list of outbound deliveries. The dispatch layer
//! owns all sending: events for the sender go straight down the socket,
//! broadcasts fan out through the room service.
//!
//! ERROR POLICY
//! ============
//! The relay is best-effort, not a strict protocol: malformed JSON, unknown
//! event names, missing payload fields, and events from connections that
//! never joined are all logged and dropped without a reply. Nothing a
//! client sends can crash the connection, let alone the process.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → connection tracked for broadcasts
//! 2. Client sends `join` → registered as a participant
//! 3. Events flow: message / typing-start / typing-stop / reaction
//! 4. Close → deregistration + `presence` (leave) + `presence-count`

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::Event;
use crate::services;
use crate::state::AppState;

/// Reserved message prefix that routes a chat message to the AI responder.
/// Case-sensitive, exactly one space after `ai`.
const AI_PREFIX: &str = "/ai ";

// =============================================================================
// OUTBOUND
// =============================================================================

/// Delivery plan for one outbound event. Handlers return these; the
/// dispatch layer decides how each reaches the wire.
enum Outbound {
    /// Every connected client, including the sender.
    All(Event),
    /// Every connected client except the sender.
    Others(Event),
    /// The sender only.
    Sender(Event),
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for receiving broadcast events from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<Event>(256);
    services::room::connect(&state, client_id, client_tx.clone()).await;

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let sender_events = process_inbound_text(&state, client_id, &client_tx, &text).await;
                        for event in sender_events {
                            let _ = send_event(&mut socket, &event).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    handle_disconnect(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return events for the
/// sender.
///
/// This keeps the websocket transport concerns separate from event
/// handling, so tests can exercise routing and fan-out end-to-end.
async fn process_inbound_text(
    state: &AppState,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Event>,
    text: &str,
) -> Vec<Event> {
    let event: Event = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            debug!(%client_id, error = %e, "ws: malformed inbound event dropped");
            return Vec::new();
        }
    };

    let outbound = match event.name.as_str() {
        "join" => handle_join(state, client_id, &event).await,
        "message" => handle_message(state, client_id, client_tx, &event).await,
        "typing-start" => handle_typing(state, client_id, true).await,
        "typing-stop" => handle_typing(state, client_id, false).await,
        "reaction" => handle_reaction(state, client_id, &event).await,
        other => {
            debug!(%client_id, event = other, "ws: unknown event dropped");
            Vec::new()
        }
    };

    apply(state, client_id, outbound).await
}

/// Apply a delivery plan — the dispatch layer owns all outbound logic.
async fn apply(state: &AppState, client_id: Uuid, outbound: Vec<Outbound>) -> Vec<Event> {
    let mut sender_events = Vec::new();
    for delivery in outbound {
        match delivery {
            Outbound::All(event) => services::room::broadcast(state, &event, None).await,
            Outbound::Others(event) => services::room::broadcast(state, &event, Some(client_id)).await,
            Outbound::Sender(event) => sender_events.push(event),
        }
    }
    sender_events
}

// =============================================================================
// JOIN
// =============================================================================

async fn handle_join(state: &AppState, client_id: Uuid, event: &Event) -> Vec<Outbound> {
    let Some(name) = event.str_field("name").map(str::trim).filter(|n| !n.is_empty()) else {
        debug!(%client_id, "ws: join without a name dropped");
        return Vec::new();
    };

    // Re-join of an already registered connection overwrites the entry and
    // may assign a new color.
    let (participant, count) = services::room::register(state, client_id, name).await;

    vec![
        Outbound::Sender(
            Event::named("welcome").with("text", format!("Welcome to the chat, {}!", participant.name)),
        ),
        Outbound::Others(
            Event::named("presence")
                .with("text", format!("{} joined the chat", participant.name))
                .with("kind", "join")
                .with("name", participant.name.clone())
                .with("color", participant.color.clone()),
        ),
        Outbound::All(Event::named("presence-count").with("count", count)),
        Outbound::Sender(Event::named("color-assigned").with("color", participant.color)),
    ]
}

// =============================================================================
// MESSAGE
// =============================================================================

async fn handle_message(
    state: &AppState,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Event>,
    event: &Event,
) -> Vec<Outbound> {
    let Some(participant) = services::room::lookup(state, client_id).await else {
        debug!(%client_id, "ws: message from unregistered connection dropped");
        return Vec::new();
    };
    let Some(text) = event.str_field("text") else {
        debug!(%client_id, "ws: message without text dropped");
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }

    // The prefix is matched against the raw text, so leading whitespace
    // makes a literal message rather than an AI prompt.
    if let Some(prompt) = text.strip_prefix(AI_PREFIX) {
        return spawn_ai_reply(state, client_id, client_tx, prompt.to_owned());
    }

    let mut message = Event::named("chat-message")
        .with("text", text.trim())
        .with("name", participant.name)
        .with("color", participant.color)
        .with("messageId", Uuid::new_v4().to_string());
    if let Some(reply_to) = event.str_field("replyTo") {
        message = message.with("replyTo", reply_to);
    }
    vec![Outbound::All(message)]
}

/// Kick off an AI request for the sender. The responder call runs on a
/// detached task holding only the sender's channel — other participants'
/// events keep flowing while it is outstanding, and a reply for a
/// connection that closed mid-request dies in a failed channel send.
fn spawn_ai_reply(
    state: &AppState,
    client_id: Uuid,
    client_tx: &mpsc::Sender<Event>,
    prompt: String,
) -> Vec<Outbound> {
    info!(%client_id, prompt_len = prompt.len(), "ws: ai request spawned");
    let responder = state.responder.clone();
    let tx = client_tx.clone();
    tokio::spawn(async move {
        let response = responder.respond(&prompt).await;
        let _ = tx.send(Event::named("ai-typing").with("active", false)).await;
        let _ = tx
            .send(
                Event::named("ai-response")
                    .with("prompt", prompt)
                    .with("response", response),
            )
            .await;
    });
    vec![Outbound::Sender(Event::named("ai-typing").with("active", true))]
}

// =============================================================================
// TYPING
// =============================================================================

async fn handle_typing(state: &AppState, client_id: Uuid, is_typing: bool) -> Vec<Outbound> {
    let Some(participant) = services::room::lookup(state, client_id).await else {
        debug!(%client_id, "ws: typing event from unregistered connection dropped");
        return Vec::new();
    };

    // Stateless relay: nothing is recorded about who is typing.
    vec![Outbound::Others(
        Event::named("user-typing")
            .with("name", participant.name)
            .with("color", participant.color)
            .with("isTyping", is_typing),
    )]
}

// =============================================================================
// REACTION
// =============================================================================

async fn handle_reaction(state: &AppState, client_id: Uuid, event: &Event) -> Vec<Outbound> {
    let Some(participant) = services::room::lookup(state, client_id).await else {
        debug!(%client_id, "ws: reaction from unregistered connection dropped");
        return Vec::new();
    };
    let (Some(message_id), Some(emoji)) = (event.str_field("messageId"), event.str_field("emoji")) else {
        debug!(%client_id, "ws: reaction with missing fields dropped");
        return Vec::new();
    };

    // Purely relayed: no check that messageId refers to a real message.
    vec![Outbound::All(
        Event::named("message-reaction")
            .with("messageId", message_id)
            .with("emoji", emoji)
            .with("name", participant.name)
            .with("color", participant.color),
    )]
}

// =============================================================================
// DISCONNECT
// =============================================================================

/// Deregister a closed connection and notify the room. A connection that
/// never joined disappears without any broadcast.
async fn handle_disconnect(state: &AppState, client_id: Uuid) {
    let Some((participant, count)) = services::room::disconnect(state, client_id).await else {
        return;
    };

    // The sender slot is already gone, so both broadcasts reach only peers.
    let leave = Event::named("presence")
        .with("text", format!("{} left the chat", participant.name))
        .with("kind", "leave")
        .with("name", participant.name)
        .with("color", participant.color);
    services::room::broadcast(state, &leave, None).await;
    services::room::broadcast(state, &Event::named("presence-count").with("count", count), None).await;
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, event: &Event) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    // Typing indicators are spammy; keep them out of the info log.
    let is_typing = matches!(event.name.as_str(), "user-typing" | "ai-typing");
    if !is_typing {
        info!(event = %event.name, "ws: send event");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
