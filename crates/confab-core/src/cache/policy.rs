//! Freshness policy and verdicts

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default freshness window for newly stored entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// How long an entry counts as fresh after its last verification.
///
/// Serialized in humantime syntax ("15m", "2h") so entry files stay
/// readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlPolicy(#[serde(with = "humantime_serde")] pub Duration);

impl TtlPolicy {
    pub fn new(max_age: Duration) -> Self {
        Self(max_age)
    }

    pub fn max_age(&self) -> Duration {
        self.0
    }

    /// Judge an entry verified at `last_verified_at` as of `now`.
    ///
    /// Fresh means strictly younger than the window; an entry exactly at
    /// the boundary is stale. A `last_verified_at` in the future (clock
    /// skew) counts as fresh rather than wrapping around.
    pub fn evaluate(&self, last_verified_at: DateTime<Utc>, now: DateTime<Utc>) -> StalenessVerdict {
        match (now - last_verified_at).to_std() {
            Ok(age) if age < self.0 => StalenessVerdict::Fresh,
            Ok(_) => StalenessVerdict::Stale,
            Err(_) => StalenessVerdict::Fresh,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self(DEFAULT_TTL)
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalenessVerdict {
    /// Entry exists and is within its freshness window
    Fresh,
    /// Entry exists but its window has elapsed
    Stale,
    /// No entry under this key
    Missing,
    /// Entry is tombstoned: the upstream record no longer exists
    Gone,
}

impl StalenessVerdict {
    pub fn name(&self) -> &'static str {
        match self {
            StalenessVerdict::Fresh => "fresh",
            StalenessVerdict::Stale => "stale",
            StalenessVerdict::Missing => "missing",
            StalenessVerdict::Gone => "gone",
        }
    }
}

impl std::fmt::Display for StalenessVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
