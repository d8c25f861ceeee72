//! Provider-specific decoding into canonical records
//!
//! Raw lines arrive wrapped in a small envelope: the provider's native
//! record plus a `unit` field naming the record kind and an optional
//! `fetched_at` RFC 3339 stamp. Decoding maps each provider's field
//! names onto the per-kind canonical payload schema:
//!
//! - organization: `name`
//! - conversation: `title`, `createdAt?`, `updatedAt?`, `summary?`, `model?`
//! - message: `role`, `text`, `createdAt?`
//!
//! Decoding is pure; the clock is consulted only to stamp a missing
//! `fetched_at`.

mod chatgpt;
mod claude;


use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::{ConfabError, ConfabResult};
use crate::record::{CanonicalRecord, Provider, RecordKind};

/// Decode one enveloped raw record into canonical form.
///
/// Failures are record-scoped ([`MalformedRecord`](ConfabError::MalformedRecord)
/// or [`UnsupportedProvider`](ConfabError::UnsupportedProvider)); callers
/// skip the record and keep the stream going.
pub fn decode(provider: &Provider, raw: &Value) -> ConfabResult<CanonicalRecord> {
    match provider {
        Provider::Claude => claude::decode(raw),
        Provider::ChatGpt => chatgpt::decode(raw),
        Provider::Custom(name) => Err(ConfabError::unsupported_provider(name.clone())),
    }
}

fn envelope_kind(raw: &Value) -> ConfabResult<RecordKind> {
    let unit = raw.get("unit").and_then(Value::as_str).ok_or_else(|| {
        ConfabError::malformed_record("Record is missing the envelope field 'unit'")
    })?;
    unit.parse().map_err(ConfabError::malformed_record)
}

/// Envelope `fetched_at`, defaulting to now when absent or unparseable.
fn envelope_fetched_at(raw: &Value) -> DateTime<Utc> {
    match raw.get("fetched_at").and_then(Value::as_str) {
        Some(stamp) => match DateTime::parse_from_rfc3339(stamp) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                warn!("Ignoring unparseable fetched_at {:?}: {}", stamp, e);
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}

fn required_str<'a>(raw: &'a Value, field: &str) -> ConfabResult<&'a str> {
    raw.get(field).and_then(Value::as_str).ok_or_else(|| {
        ConfabError::malformed_record(format!("Record is missing required field '{field}'"))
    })
}

/// Re-render an RFC 3339 timestamp in canonical UTC form, or `None` when
/// it does not parse (callers then carry the original verbatim).
fn canonical_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc).to_rfc3339())
}
