//! Write-path composition: source → normalizer → cache
//!
//! The stream stages compose the same flow over pipes; `Refresher` is the
//! in-process form, plus the drift-repair operations a UX layer hangs
//! off: `get_fresh` (block-then-serve, degrading to stale when the
//! upstream is down) and `force_refresh` (invalidate, then re-fetch).

use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStore, StalenessVerdict};
use crate::error::{ConfabError, ConfabResult};
use crate::normalize;
use crate::record::{RecordKey, RecordKind};
use crate::source::RawSource;
use crate::stream::StageSummary;

pub struct Refresher<S> {
    source: S,
    store: CacheStore,
}

impl<S: RawSource> Refresher<S> {
    pub fn new(source: S, store: CacheStore) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Fetch, decode, and store every organization the source lists.
    ///
    /// Undecodable records are skipped with a diagnostic; a failing
    /// source or a failing write aborts.
    pub async fn sync_organizations(&self) -> ConfabResult<StageSummary> {
        let records = self.source.fetch_organizations().await?;
        let summary = self.sync_stream(records).await?;
        debug!(
            "Organization sync: {} stored, {} skipped",
            summary.records_out, summary.skipped
        );
        Ok(summary)
    }

    /// Fetch, decode, and store one conversation and its messages.
    pub async fn sync_conversation(&self, id: &str) -> ConfabResult<StageSummary> {
        let records = self.source.fetch_conversation(id).await?;
        let summary = self.sync_stream(records).await?;
        debug!(
            "Conversation {} sync: {} stored, {} skipped",
            id, summary.records_out, summary.skipped
        );
        Ok(summary)
    }

    /// Invalidate `key`, then re-fetch it through the pipeline.
    ///
    /// An upstream `NotFound` yields a `Gone` verdict; with the entry
    /// already evicted there is usually nothing left to tombstone, but a
    /// concurrently re-created entry still gets one.
    pub async fn force_refresh(
        &self,
        key: &RecordKey,
    ) -> ConfabResult<(Option<CacheEntry>, StalenessVerdict)> {
        let (existing, _) = self.store.get(key).await;
        self.store.invalidate(key).await?;

        match self.refetch(key, existing.as_ref()).await {
            Ok(()) => Ok(self.store.get(key).await),
            Err(ConfabError::NotFound { .. }) => {
                let entry = self.store.mark_gone(key).await?;
                Ok((entry, StalenessVerdict::Gone))
            }
            Err(e) => Err(e),
        }
    }

    /// Serve `key` from the cache, re-fetching first when it is missing
    /// or stale.
    ///
    /// Blocks on the fetch rather than serving stale and repairing in the
    /// background; when the source is unavailable and a stale entry
    /// exists, the stale entry is served with a diagnostic instead.
    /// `Gone` is returned as-is for the caller to surface.
    pub async fn get_fresh(
        &self,
        key: &RecordKey,
    ) -> ConfabResult<(Option<CacheEntry>, StalenessVerdict)> {
        let (entry, verdict) = self.store.get(key).await;
        match verdict {
            StalenessVerdict::Fresh | StalenessVerdict::Gone => Ok((entry, verdict)),
            StalenessVerdict::Missing => match self.refetch(key, None).await {
                Ok(()) => Ok(self.store.get(key).await),
                Err(ConfabError::NotFound { .. }) => {
                    let tombstoned = self.store.mark_gone(key).await?;
                    Ok((tombstoned, StalenessVerdict::Gone))
                }
                Err(e) => Err(e),
            },
            StalenessVerdict::Stale => match self.refetch(key, entry.as_ref()).await {
                Ok(()) => Ok(self.store.get(key).await),
                Err(e @ ConfabError::SourceUnavailable { .. }) => {
                    warn!("Source unavailable, serving stale entry for {}: {}", key, e);
                    Ok((entry, StalenessVerdict::Stale))
                }
                Err(ConfabError::NotFound { .. }) => {
                    let tombstoned = self.store.mark_gone(key).await?;
                    Ok((tombstoned, StalenessVerdict::Gone))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Re-fetch whatever upstream unit covers `key`.
    ///
    /// Organizations arrive in one listing; a conversation arrives with
    /// its messages. A message can only be re-fetched through its
    /// conversation, so a message key with no cached parent is left
    /// alone and the caller sees the cache as-is.
    async fn refetch(&self, key: &RecordKey, cached: Option<&CacheEntry>) -> ConfabResult<()> {
        match key.kind {
            RecordKind::Organization => {
                self.sync_organizations().await?;
            }
            RecordKind::Conversation => {
                self.sync_conversation(&key.id).await?;
            }
            RecordKind::Message => {
                match cached.and_then(|entry| entry.record.parent_id.clone()) {
                    Some(parent) => {
                        self.sync_conversation(&parent).await?;
                    }
                    None => {
                        debug!("No cached parent for {}, skipping refetch", key);
                    }
                }
            }
        }
        Ok(())
    }

    async fn sync_stream(
        &self,
        mut records: BoxStream<'_, ConfabResult<Value>>,
    ) -> ConfabResult<StageSummary> {
        let provider = self.source.provider();
        let mut summary = StageSummary::default();

        while let Some(raw) = records.next().await {
            let raw = raw?;
            summary.records_in += 1;
            match normalize::decode(&provider, &raw) {
                Ok(record) => {
                    self.store.put(record).await?;
                    summary.records_out += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping undecodable record from {}: {}", provider, e);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }
}
