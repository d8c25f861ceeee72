//! Filesystem-backed cache store
//!
//! Layout under the configured root is `{provider}/{kind}/{id}.json`,
//! one pretty-printed [`CacheEntry`] per file. Writes for the same key
//! are serialized through a per-key async mutex and land atomically
//! (write to a temp file in the same directory, then rename), so readers
//! never observe a half-written entry and never take a lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_stream::stream;
use chrono::Utc;
use dashmap::DashMap;
use futures::Stream;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::entry::CacheEntry;
use super::policy::{StalenessVerdict, TtlPolicy};
use crate::config::StoreConfig;
use crate::error::{ConfabError, ConfabResult};
use crate::record::{encode_component, CanonicalRecord, Provider, RecordKey, RecordKind};

/// Distinguishes temp files across concurrent writers in one process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Narrows a [`CacheStore::list`] walk by provider, kind, or id prefix.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilter {
    pub provider: Option<Provider>,
    pub kind: Option<RecordKind>,
    pub id_prefix: Option<String>,
}

impl ScopeFilter {
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        if let Some(provider) = &self.provider
            && record.provider != *provider
        {
            return false;
        }
        if let Some(kind) = self.kind
            && record.kind != kind
        {
            return false;
        }
        if let Some(prefix) = &self.id_prefix
            && !record.id.starts_with(prefix.as_str())
        {
            return false;
        }
        true
    }
}

/// The on-disk record cache.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct CacheStore {
    config: StoreConfig,
    /// Per-key write locks, created on first write to a key.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CacheStore {
    /// Open a store rooted at `config.root`, creating the directory if
    /// needed.
    pub fn open(config: StoreConfig) -> ConfabResult<Self> {
        std::fs::create_dir_all(&config.root).map_err(|e| {
            ConfabError::storage_with_path(
                format!("Failed to create cache root: {e}"),
                config.root.display().to_string(),
            )
        })?;
        Ok(Self {
            config,
            locks: DashMap::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn entry_path(&self, key: &RecordKey) -> PathBuf {
        self.config.root.join(key.relative_path())
    }

    /// Store a record, returning the entry as persisted.
    ///
    /// When the key already holds a live entry with the same content
    /// hash, only `last_verified_at` is re-stamped; payload, `stored_at`
    /// and the stored policy are untouched. Anything else (new key,
    /// changed content, tombstoned entry) gets a full replacement, which
    /// also clears any tombstone.
    pub async fn put(&self, record: CanonicalRecord) -> ConfabResult<CacheEntry> {
        let key = record.key();
        let path = self.entry_path(&key);

        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let entry = match read_entry(&path).await {
            Some(mut existing)
                if !existing.is_tombstoned()
                    && existing.record.content_hash == record.content_hash =>
            {
                debug!("Content unchanged for {}, refreshing verification", key);
                existing.last_verified_at = Utc::now();
                existing
            }
            _ => {
                debug!("Storing {}", key);
                CacheEntry::new(record, TtlPolicy::new(self.config.ttl))
            }
        };

        self.write_entry(&path, &entry).await?;
        Ok(entry)
    }

    /// Look up a key and judge it under the entry's own stored policy.
    ///
    /// Never takes a lock and never fails: unreadable or corrupt entry
    /// files degrade to `Missing` with a diagnostic.
    pub async fn get(&self, key: &RecordKey) -> (Option<CacheEntry>, StalenessVerdict) {
        match read_entry(&self.entry_path(key)).await {
            Some(entry) => {
                let verdict = entry.verdict_at(Utc::now());
                (Some(entry), verdict)
            }
            None => (None, StalenessVerdict::Missing),
        }
    }

    /// Like [`get`](Self::get), but judged under a caller-supplied
    /// policy instead of the one stamped at store time.
    pub async fn get_with_policy(
        &self,
        key: &RecordKey,
        policy: TtlPolicy,
    ) -> (Option<CacheEntry>, StalenessVerdict) {
        match read_entry(&self.entry_path(key)).await {
            Some(entry) => {
                let verdict = entry.verdict_with(policy, Utc::now());
                (Some(entry), verdict)
            }
            None => (None, StalenessVerdict::Missing),
        }
    }

    /// Delete the entry under `key`. Deleting an absent key is not an
    /// error.
    pub async fn invalidate(&self, key: &RecordKey) -> ConfabResult<()> {
        let path = self.entry_path(key);

        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Invalidated {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfabError::io_with_path(
                format!("Failed to remove entry: {e}"),
                path.display().to_string(),
            )),
        }
    }

    /// Tombstone the entry under `key`, keeping its last known content.
    ///
    /// Returns the tombstoned entry, or `None` when there was nothing to
    /// tombstone.
    pub async fn mark_gone(&self, key: &RecordKey) -> ConfabResult<Option<CacheEntry>> {
        let path = self.entry_path(key);

        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let Some(mut entry) = read_entry(&path).await else {
            return Ok(None);
        };
        entry.tombstoned_at = Some(Utc::now());
        self.write_entry(&path, &entry).await?;
        debug!("Tombstoned {}", key);
        Ok(Some(entry))
    }

    /// Walk the store and yield entries matching `filter`, provider by
    /// provider, kind by kind, in lexicographic file order.
    ///
    /// Unreadable or corrupt files are skipped with a diagnostic; temp
    /// files from in-flight writes never match the `.json` suffix.
    pub fn list(&self, filter: ScopeFilter) -> impl Stream<Item = CacheEntry> {
        let root = self.config.root.clone();
        stream! {
            let provider_filter = filter.provider.as_ref().map(|p| encode_component(p.name()));
            for provider_dir in subdirs(&root, provider_filter).await {
                let kind_filter = filter.kind.map(|k| k.name().to_string());
                for kind_dir in subdirs(&provider_dir, kind_filter).await {
                    for file in entry_files(&kind_dir).await {
                        if let Some(entry) = read_entry(&file).await
                            && filter.matches(&entry.record)
                        {
                            yield entry;
                        }
                    }
                }
            }
        }
    }

    /// Write an entry atomically: temp file in the target directory,
    /// then rename over the final path.
    async fn write_entry(&self, path: &Path, entry: &CacheEntry) -> ConfabResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ConfabError::storage_with_path(
                    format!("Failed to create entry directory: {e}"),
                    parent.display().to_string(),
                )
            })?;
        }

        let json = serde_json::to_string_pretty(entry)?;
        let temp_name = format!(
            "{}.{}.{}.tmp",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("entry"),
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed),
        );
        let temp_path = path.with_file_name(temp_name);

        fs::write(&temp_path, json).await.map_err(|e| {
            ConfabError::io_with_path(
                format!("Failed to write entry: {e}"),
                temp_path.display().to_string(),
            )
        })?;

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ConfabError::io_with_path(
                format!("Failed to publish entry: {e}"),
                path.display().to_string(),
            ));
        }
        Ok(())
    }
}

/// Read and parse an entry file, degrading every failure to `None`.
///
/// A missing file is the normal cache-miss path and stays silent; any
/// other failure gets a diagnostic.
async fn read_entry(path: &Path) -> Option<CacheEntry> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read cache entry {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Skipping corrupt cache entry {}: {}", path.display(), e);
            None
        }
    }
}

/// Subdirectories of `dir`, or just `dir/{only}` when a filter narrows
/// the walk to one child. Sorted for deterministic listing order.
async fn subdirs(dir: &Path, only: Option<String>) -> Vec<PathBuf> {
    if let Some(name) = only {
        let path = dir.join(name);
        let is_dir = fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        return if is_dir { vec![path] } else { Vec::new() };
    }

    let mut dirs = Vec::new();
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return dirs,
        Err(e) => {
            warn!("Failed to list cache directory {}: {}", dir.display(), e);
            return dirs;
        }
    };
    while let Ok(Some(dir_entry)) = reader.next_entry().await {
        if let Ok(file_type) = dir_entry.file_type().await
            && file_type.is_dir()
        {
            dirs.push(dir_entry.path());
        }
    }
    dirs.sort();
    dirs
}

/// Entry files (`*.json`) directly under `dir`, sorted.
async fn entry_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) => {
            warn!("Failed to list cache directory {}: {}", dir.display(), e);
            return files;
        }
    };
    while let Ok(Some(dir_entry)) = reader.next_entry().await {
        let path = dir_entry.path();
        let is_file = dir_entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    files
}
