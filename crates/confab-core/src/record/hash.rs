//! Canonical content hashing for record payloads
//!
//! Two payloads that differ only in JSON object key order must hash the
//! same, so the hash is computed over a canonical serialization: object
//! keys sorted lexicographically at every nesting level, arrays kept in
//! order, no insignificant whitespace. The canonical form is a strict
//! subset of serde_json output and never leaves this module.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Hash a payload into a lowercase hex SHA-256 digest.
pub fn content_hash(payload: &Map<String, Value>) -> String {
    let mut canonical = String::new();
    write_object(&mut canonical, payload);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by_key(|&(key, _)| key);

    out.push('{');
    for (index, (key, value)) in entries.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        // Value::String applies JSON string escaping to the key.
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => write_object(out, map),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
