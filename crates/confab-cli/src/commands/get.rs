//! Get stage: one key → one `{verdict, entry}` line

use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWrite;

use confab_core::cache::{CacheEntry, CacheStore, StalenessVerdict, TtlPolicy};
use confab_core::error::ConfabResult;
use confab_core::record::RecordKey;
use confab_core::stream::RecordWriter;

use crate::args::GetArgs;

/// The one line this stage emits. A `missing` verdict has no entry and
/// is still exit status 0: a correct answer is not a failure.
#[derive(Debug, Serialize)]
struct GetOutput {
    verdict: StalenessVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<CacheEntry>,
}

pub async fn run(args: GetArgs) -> ConfabResult<()> {
    let store = CacheStore::open(args.cache.store_config()?)?;
    let ttl = args.cache.ttl;
    let key = RecordKey::new(args.provider, args.kind, args.id);

    execute(&store, &key, ttl, tokio::io::stdout()).await
}

async fn execute<W>(
    store: &CacheStore,
    key: &RecordKey,
    ttl: Option<Duration>,
    output: W,
) -> ConfabResult<()>
where
    W: AsyncWrite + Unpin,
{
    let (entry, verdict) = match ttl {
        Some(ttl) => store.get_with_policy(key, TtlPolicy::new(ttl)).await,
        None => store.get(key).await,
    };

    let mut writer = RecordWriter::new(output);
    writer.write(&GetOutput { verdict, entry }).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_core::config::StoreConfig;
    use confab_core::record::{CanonicalRecord, Provider, RecordKind};
    use chrono::Utc;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_record() -> CanonicalRecord {
        let mut payload = serde_json::Map::new();
        payload.insert("text".to_string(), json!("hello"));
        payload.insert("role".to_string(), json!("user"));
        CanonicalRecord::new(
            RecordKind::Message,
            "m-1",
            Provider::Claude,
            payload,
            Utc::now(),
        )
    }

    async fn run_get(
        store: &CacheStore,
        key: &RecordKey,
        ttl: Option<Duration>,
    ) -> serde_json::Value {
        let mut output = Vec::new();
        execute(store, key, ttl, &mut output).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        serde_json::from_str(text.trim()).unwrap()
    }

    #[tokio::test]
    async fn test_reports_fresh_entry() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();
        store.put(sample_record()).await.unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Message, "m-1");
        let report = run_get(&store, &key, None).await;
        assert_eq!(report["verdict"], "fresh");
        assert_eq!(report["entry"]["record"]["id"], "m-1");
    }

    #[tokio::test]
    async fn test_missing_key_reports_missing_without_entry() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Message, "nope");
        let report = run_get(&store, &key, None).await;
        assert_eq!(report["verdict"], "missing");
        assert!(report.get("entry").is_none());
    }

    #[tokio::test]
    async fn test_caller_ttl_narrows_the_verdict() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(StoreConfig::new(dir.path())).unwrap();
        store.put(sample_record()).await.unwrap();

        let key = RecordKey::new(Provider::Claude, RecordKind::Message, "m-1");
        let report = run_get(&store, &key, Some(Duration::ZERO)).await;
        assert_eq!(report["verdict"], "stale");
        // The stale entry is still served; policy belongs to the caller.
        assert_eq!(report["entry"]["record"]["id"], "m-1");
    }
}
