use super::*;
use serde_json::json;

#[test]
fn named_sets_fields() {
    let event = Event::named("chat-message");
    assert_eq!(event.name, "chat-message");
    assert!(event.ts > 0);
    assert!(event.data.is_empty());
}

#[test]
fn with_inserts_payload_values() {
    let event = Event::named("presence-count")
        .with("count", 3)
        .with("note", "three connected");

    assert_eq!(event.data.get("count").and_then(serde_json::Value::as_u64), Some(3));
    assert_eq!(event.str_field("note"), Some("three connected"));
}

#[test]
fn str_field_rejects_non_string_values() {
    let event = Event::named("reaction").with("messageId", 42);
    assert_eq!(event.str_field("messageId"), None);
    assert_eq!(event.str_field("missing"), None);
}

#[test]
fn json_round_trip() {
    let original = Event::named("user-typing")
        .with("name", "Alice")
        .with("isTyping", true);

    let json = serde_json::to_string(&original).expect("serialize");
    let restored: Event = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored.name, "user-typing");
    assert_eq!(restored.ts, original.ts);
    assert_eq!(restored.str_field("name"), Some("Alice"));
    assert_eq!(
        restored.data.get("isTyping").and_then(serde_json::Value::as_bool),
        Some(true)
    );
}

#[test]
fn missing_data_deserializes_to_empty_map() {
    let restored: Event = serde_json::from_str(r#"{"name":"typing-start","ts":1}"#).expect("deserialize");
    assert_eq!(restored.name, "typing-start");
    assert!(restored.data.is_empty());
}

#[test]
fn inbound_payload_survives_extra_fields() {
    let raw = json!({
        "name": "join",
        "ts": 12,
        "data": { "name": "Bob", "unexpected": { "nested": true } }
    });
    let restored: Event = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(restored.str_field("name"), Some("Bob"));
}
