//! Decoding for ChatGPT export records

use chrono::DateTime;
use serde_json::{json, Map, Value};

use super::{canonical_timestamp, envelope_fetched_at, envelope_kind, required_str};
use crate::error::{ConfabError, ConfabResult};
use crate::record::{CanonicalRecord, Provider, RecordKind};

pub(super) fn decode(raw: &Value) -> ConfabResult<CanonicalRecord> {
    let kind = envelope_kind(raw)?;
    let fetched_at = envelope_fetched_at(raw);
    let id = required_str(raw, "id")?;

    match kind {
        RecordKind::Organization => Err(ConfabError::malformed_record(
            "ChatGPT exports carry no organization records",
        )),
        RecordKind::Conversation => {
            let mut payload = Map::new();
            payload.insert(
                "title".to_string(),
                json!(raw.get("title").and_then(Value::as_str).unwrap_or("")),
            );
            copy_timestamp(raw, "create_time", "createdAt", &mut payload);
            copy_timestamp(raw, "update_time", "updatedAt", &mut payload);
            Ok(CanonicalRecord::new(
                kind,
                id,
                Provider::ChatGpt,
                payload,
                fetched_at,
            ))
        }
        RecordKind::Message => {
            let role = raw
                .get("author")
                .and_then(|author| author.get("role"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ConfabError::malformed_record(
                        "Message is missing required field 'author.role'",
                    )
                })?;
            let parent = required_str(raw, "conversation_id")?;

            let mut payload = Map::new();
            payload.insert("role".to_string(), json!(role));
            payload.insert("text".to_string(), json!(joined_parts(raw)));
            copy_timestamp(raw, "create_time", "createdAt", &mut payload);

            Ok(
                CanonicalRecord::new(kind, id, Provider::ChatGpt, payload, fetched_at)
                    .with_parent(parent),
            )
        }
    }
}

/// Message text lives in `content.parts`; non-string parts (tool calls,
/// attachments) are dropped.
fn joined_parts(raw: &Value) -> String {
    raw.get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Export timestamps are epoch seconds (possibly fractional) in most
/// dumps and RFC 3339 strings in a few; both land under the canonical
/// key as RFC 3339.
fn copy_timestamp(raw: &Value, field: &str, target: &str, payload: &mut Map<String, Value>) {
    let Some(value) = raw.get(field) else {
        return;
    };
    let rendered = if let Some(secs) = value.as_f64() {
        epoch_to_rfc3339(secs)
    } else {
        value
            .as_str()
            .map(|s| canonical_timestamp(s).unwrap_or_else(|| s.to_string()))
    };
    if let Some(rendered) = rendered {
        payload.insert(target.to_string(), json!(rendered));
    }
}

fn epoch_to_rfc3339(secs: f64) -> Option<String> {
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
    DateTime::from_timestamp(whole, nanos).map(|stamp| stamp.to_rfc3339())
}
