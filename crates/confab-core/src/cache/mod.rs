//! Disk cache for canonical records
//!
//! Entries live under `{root}/{provider}/{kind}/{id}.json`. Reads are
//! lock-free and infallible; writes are serialized per key and published
//! atomically. Staleness is a verdict computed at read time, never a
//! background job.

mod entry;
mod policy;
mod store;

#[cfg(test)]
mod tests;

pub use entry::CacheEntry;
pub use policy::{StalenessVerdict, TtlPolicy, DEFAULT_TTL};
pub use store::{CacheStore, ScopeFilter};
