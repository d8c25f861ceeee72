//! The canonical record shared by every pipeline stage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Provider, RecordKey, RecordKind};

/// A provider-agnostic chat record.
///
/// This is the one shape all stages exchange on stdout/stdin and the
/// cache persists to disk. `payload` holds the normalized body fields
/// (name, title, text, timestamps and so on); `content_hash` is the
/// canonical SHA-256 of that payload and is what the cache compares to
/// detect unchanged records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub kind: RecordKind,
    pub id: String,
    pub provider: Provider,
    /// Owning record, when one exists: a conversation points at its
    /// organization, a message at its conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub content_hash: String,
    pub payload: Map<String, Value>,
    pub fetched_at: DateTime<Utc>,
}

impl CanonicalRecord {
    /// Build a record, computing its content hash from the payload.
    pub fn new(
        kind: RecordKind,
        id: impl Into<String>,
        provider: Provider,
        payload: Map<String, Value>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let content_hash = super::hash::content_hash(&payload);
        Self {
            kind,
            id: id.into(),
            provider,
            parent_id: None,
            content_hash,
            payload,
            fetched_at,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// The cache key this record lives under.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.provider.clone(), self.kind, self.id.clone())
    }
}
