//! Cache entries as persisted on disk

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::policy::{StalenessVerdict, TtlPolicy};
use crate::record::CanonicalRecord;

/// One cached record plus its bookkeeping.
///
/// `stored_at` is set once when the entry is first written;
/// `last_verified_at` is re-stamped every time the upstream content is
/// confirmed, which is what freshness is judged against. A set
/// `tombstoned_at` marks the upstream record as deleted while keeping
/// the last known content around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub record: CanonicalRecord,
    pub stored_at: DateTime<Utc>,
    pub last_verified_at: DateTime<Utc>,
    pub ttl_policy: TtlPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tombstoned_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Wrap a freshly fetched record, stamping both timestamps to now.
    pub fn new(record: CanonicalRecord, ttl_policy: TtlPolicy) -> Self {
        let now = Utc::now();
        Self {
            record,
            stored_at: now,
            last_verified_at: now,
            ttl_policy,
            tombstoned_at: None,
        }
    }

    pub fn is_tombstoned(&self) -> bool {
        self.tombstoned_at.is_some()
    }

    /// Judge this entry under its own stored policy.
    pub fn verdict_at(&self, now: DateTime<Utc>) -> StalenessVerdict {
        self.verdict_with(self.ttl_policy, now)
    }

    /// Judge this entry under a caller-supplied policy.
    ///
    /// Tombstones win over freshness: a tombstoned entry is Gone no
    /// matter how recently it was verified.
    pub fn verdict_with(&self, policy: TtlPolicy, now: DateTime<Utc>) -> StalenessVerdict {
        if self.is_tombstoned() {
            return StalenessVerdict::Gone;
        }
        policy.evaluate(self.last_verified_at, now)
    }
}
