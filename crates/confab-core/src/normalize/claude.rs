//! Decoding for claude.ai records

use serde_json::{json, Map, Value};

use super::{canonical_timestamp, envelope_fetched_at, envelope_kind, required_str};
use crate::error::ConfabResult;
use crate::record::{CanonicalRecord, Provider, RecordKind};

pub(super) fn decode(raw: &Value) -> ConfabResult<CanonicalRecord> {
    let kind = envelope_kind(raw)?;
    let fetched_at = envelope_fetched_at(raw);
    let id = required_str(raw, "uuid")?;

    match kind {
        RecordKind::Organization => {
            let mut payload = Map::new();
            payload.insert("name".to_string(), json!(required_str(raw, "name")?));
            Ok(CanonicalRecord::new(
                kind,
                id,
                Provider::Claude,
                payload,
                fetched_at,
            ))
        }
        RecordKind::Conversation => {
            let mut payload = Map::new();
            // Untitled conversations come through with a null or missing
            // name; the canonical title is then empty.
            payload.insert(
                "title".to_string(),
                json!(raw.get("name").and_then(Value::as_str).unwrap_or("")),
            );
            copy_timestamp(raw, "created_at", "createdAt", &mut payload);
            copy_timestamp(raw, "updated_at", "updatedAt", &mut payload);
            copy_string(raw, "summary", &mut payload);
            copy_string(raw, "model", &mut payload);

            let mut record =
                CanonicalRecord::new(kind, id, Provider::Claude, payload, fetched_at);
            if let Some(org) = raw.get("organization_uuid").and_then(Value::as_str) {
                record = record.with_parent(org);
            }
            Ok(record)
        }
        RecordKind::Message => {
            let sender = required_str(raw, "sender")?;
            let text = required_str(raw, "text")?;
            let parent = required_str(raw, "conversation_uuid")?;

            let mut payload = Map::new();
            // claude.ai says "human" where the canonical schema says
            // "user"; other senders pass through as-is.
            let role = if sender == "human" { "user" } else { sender };
            payload.insert("role".to_string(), json!(role));
            payload.insert("text".to_string(), json!(text));
            copy_timestamp(raw, "created_at", "createdAt", &mut payload);

            Ok(
                CanonicalRecord::new(kind, id, Provider::Claude, payload, fetched_at)
                    .with_parent(parent),
            )
        }
    }
}

fn copy_string(raw: &Value, field: &str, payload: &mut Map<String, Value>) {
    if let Some(value) = raw.get(field).and_then(Value::as_str) {
        payload.insert(field.to_string(), json!(value));
    }
}

/// Canonicalize a timestamp field when it parses, carry it verbatim when
/// it does not.
fn copy_timestamp(raw: &Value, field: &str, target: &str, payload: &mut Map<String, Value>) {
    if let Some(value) = raw.get(field).and_then(Value::as_str) {
        let rendered = canonical_timestamp(value).unwrap_or_else(|| value.to_string());
        payload.insert(target.to_string(), json!(rendered));
    }
}
