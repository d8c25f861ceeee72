//! Confab Core Library
//!
//! Lazy normalization-and-cache pipeline for chat conversation records:
//! provider-specific raw records are decoded into one canonical shape,
//! persisted in a filesystem cache with staleness tracking, and moved
//! between stages as JSONL streams composable with plain Unix pipes.

pub mod cache;
pub mod config;
pub mod error;
pub mod normalize;
pub mod record;
pub mod refresh;
pub mod source;
pub mod stream;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheStore, ScopeFilter, StalenessVerdict, TtlPolicy};
pub use config::StoreConfig;
pub use error::{ConfabError, ConfabResult};
pub use record::{CanonicalRecord, Provider, RecordKey, RecordKind};
pub use refresh::Refresher;
pub use source::{RawSource, StaticSource};
pub use stream::{RecordReader, RecordWriter, StageSummary};
