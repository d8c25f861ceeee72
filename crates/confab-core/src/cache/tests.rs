//! Cache store tests

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::StoreConfig;
    use crate::record::{CanonicalRecord, Provider, RecordKey, RecordKind};
    use chrono::Utc;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn record(provider: Provider, kind: RecordKind, id: &str, text: &str) -> CanonicalRecord {
        let mut payload = serde_json::Map::new();
        payload.insert("text".to_string(), json!(text));
        CanonicalRecord::new(kind, id, provider, payload, Utc::now())
    }

    fn claude_record(kind: RecordKind, id: &str, text: &str) -> CanonicalRecord {
        record(Provider::Claude, kind, id, text)
    }

    #[tokio::test]
    async fn test_put_then_get_is_fresh() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        let stored = store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Conversation, "conv-1");
        let (entry, verdict) = store.get(&key).await;
        let entry = entry.unwrap();
        assert_eq!(verdict, StalenessVerdict::Fresh);
        assert_eq!(entry.record.content_hash, stored.record.content_hash);
        assert_eq!(entry.record.id, "conv-1");
    }

    #[tokio::test]
    async fn test_unchanged_content_only_refreshes_verification() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        let first = store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();
        let second = store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();

        assert_eq!(second.record.content_hash, first.record.content_hash);
        assert_eq!(second.record.payload, first.record.payload);
        assert_eq!(second.record.fetched_at, first.record.fetched_at);
        assert_eq!(second.stored_at, first.stored_at);
        assert!(second.last_verified_at >= first.last_verified_at);
    }

    #[tokio::test]
    async fn test_changed_content_replaces_entry() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        let first = store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();
        let second = store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello world"))
            .await
            .unwrap();

        assert_ne!(second.record.content_hash, first.record.content_hash);

        let key = RecordKey::new(Provider::Claude, RecordKind::Conversation, "conv-1");
        let (entry, _) = store.get(&key).await;
        assert_eq!(
            entry.unwrap().record.content_hash,
            second.record.content_hash
        );
    }

    #[tokio::test]
    async fn test_zero_ttl_store_serves_stale_entries() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path()).with_ttl(Duration::ZERO);
        let store = CacheStore::open(config).unwrap();

        store
            .put(claude_record(RecordKind::Message, "msg-1", "hi"))
            .await
            .unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Message, "msg-1");
        let (entry, verdict) = store.get(&key).await;
        assert!(entry.is_some());
        assert_eq!(verdict, StalenessVerdict::Stale);
    }

    #[tokio::test]
    async fn test_caller_policy_overrides_stored_verdict() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        store
            .put(claude_record(RecordKind::Message, "msg-1", "hi"))
            .await
            .unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Message, "msg-1");
        let (_, stored_verdict) = store.get(&key).await;
        assert_eq!(stored_verdict, StalenessVerdict::Fresh);

        let (_, strict_verdict) = store
            .get_with_policy(&key, TtlPolicy::new(Duration::ZERO))
            .await;
        assert_eq!(strict_verdict, StalenessVerdict::Stale);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        store
            .put(claude_record(RecordKind::Organization, "org-1", "acme"))
            .await
            .unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Organization, "org-1");
        store.invalidate(&key).await.unwrap();

        let (entry, verdict) = store.get(&key).await;
        assert!(entry.is_none());
        assert_eq!(verdict, StalenessVerdict::Missing);

        // Invalidating an absent key is not an error.
        store.invalidate(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_gone_tombstones_and_keeps_content() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Conversation, "conv-1");
        let tombstoned = store.mark_gone(&key).await.unwrap().unwrap();
        assert!(tombstoned.is_tombstoned());
        assert_eq!(tombstoned.record.id, "conv-1");

        let (entry, verdict) = store.get(&key).await;
        assert_eq!(verdict, StalenessVerdict::Gone);
        assert!(entry.unwrap().is_tombstoned());
    }

    #[tokio::test]
    async fn test_mark_gone_on_missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Conversation, "nope");
        assert!(store.mark_gone(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_after_tombstone_resurrects() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();
        let key = RecordKey::new(Provider::Claude, RecordKind::Conversation, "conv-1");
        store.mark_gone(&key).await.unwrap();

        // Same content as before, but the tombstone forces a full replace.
        store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();

        let (entry, verdict) = store.get(&key).await;
        assert_eq!(verdict, StalenessVerdict::Fresh);
        assert!(!entry.unwrap().is_tombstoned());
    }

    #[tokio::test]
    async fn test_corrupt_entry_reads_as_missing() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Conversation, "conv-bad");
        let path = dir.path().join(key.relative_path());
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, "not json").await.unwrap();

        let (entry, verdict) = store.get(&key).await;
        assert!(entry.is_none());
        assert_eq!(verdict, StalenessVerdict::Missing);
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_and_temp_files() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        store
            .put(claude_record(RecordKind::Conversation, "conv-1", "hello"))
            .await
            .unwrap();

        let kind_dir = dir.path().join("claude").join("conversation");
        tokio::fs::write(kind_dir.join("broken.json"), "not json")
            .await
            .unwrap();
        tokio::fs::write(kind_dir.join("conv-9.json.123.0.tmp"), "{}")
            .await
            .unwrap();

        let entries: Vec<_> = store.list(ScopeFilter::default()).collect().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.id, "conv-1");
    }

    #[tokio::test]
    async fn test_list_filters_by_scope() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        store
            .put(claude_record(RecordKind::Organization, "org-1", "acme"))
            .await
            .unwrap();
        store
            .put(claude_record(RecordKind::Conversation, "conv-1", "a"))
            .await
            .unwrap();
        store
            .put(claude_record(RecordKind::Conversation, "conv-2", "b"))
            .await
            .unwrap();
        store
            .put(record(
                Provider::ChatGpt,
                RecordKind::Conversation,
                "x-1",
                "c",
            ))
            .await
            .unwrap();

        let all: Vec<_> = store.list(ScopeFilter::default()).collect().await;
        assert_eq!(all.len(), 4);

        let claude_only: Vec<_> = store
            .list(ScopeFilter::default().with_provider(Provider::Claude))
            .collect()
            .await;
        assert_eq!(claude_only.len(), 3);

        let conversations: Vec<_> = store
            .list(ScopeFilter::default().with_kind(RecordKind::Conversation))
            .collect()
            .await;
        assert_eq!(conversations.len(), 3);

        let claude_conversations: Vec<_> = store
            .list(
                ScopeFilter::default()
                    .with_provider(Provider::Claude)
                    .with_kind(RecordKind::Conversation),
            )
            .collect()
            .await;
        let ids: Vec<_> = claude_conversations
            .iter()
            .map(|e| e.record.id.as_str())
            .collect();
        assert_eq!(ids, vec!["conv-1", "conv-2"]);

        let prefixed: Vec<_> = store
            .list(ScopeFilter::default().with_id_prefix("conv-"))
            .collect()
            .await;
        assert_eq!(prefixed.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_puts_to_one_key_stay_wellformed() {
        let dir = tempdir().unwrap();
        let store = Arc::new(CacheStore::open(StoreConfig::new(dir.path())).unwrap());

        let texts = ["hello", "hello world"];
        let mut handles = Vec::new();
        for text in texts {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for _ in 0..20 {
                    store
                        .put(claude_record(RecordKind::Message, "msg-1", text))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Whoever won, the entry on disk parses and matches one of the
        // two contents.
        let key = RecordKey::new(Provider::Claude, RecordKind::Message, "msg-1");
        let (entry, verdict) = store.get(&key).await;
        let entry = entry.unwrap();
        assert_eq!(verdict, StalenessVerdict::Fresh);

        let expected: Vec<String> = texts
            .iter()
            .map(|t| {
                claude_record(RecordKind::Message, "msg-1", t)
                    .content_hash
            })
            .collect();
        assert!(expected.contains(&entry.record.content_hash));
    }
}
