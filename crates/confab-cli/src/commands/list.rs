//! List stage: cache walk → cache-entry JSONL

use futures::{pin_mut, StreamExt};
use tokio::io::AsyncWrite;

use confab_core::cache::{CacheStore, ScopeFilter};
use confab_core::error::ConfabResult;
use confab_core::stream::{RecordWriter, StageSummary};

use crate::args::ListArgs;

pub async fn run(args: ListArgs) -> ConfabResult<()> {
    let store = CacheStore::open(args.cache.store_config()?)?;

    let mut filter = ScopeFilter::default();
    if let Some(provider) = args.provider {
        filter = filter.with_provider(provider);
    }
    if let Some(kind) = args.kind {
        filter = filter.with_kind(kind);
    }
    if let Some(prefix) = args.id_prefix {
        filter = filter.with_id_prefix(prefix);
    }

    let summary = execute(&store, filter, tokio::io::stdout()).await?;
    summary.log("list");
    Ok(())
}

async fn execute<W>(
    store: &CacheStore,
    filter: ScopeFilter,
    output: W,
) -> ConfabResult<StageSummary>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = RecordWriter::new(output);
    let mut summary = StageSummary::default();

    let entries = store.list(filter);
    pin_mut!(entries);
    while let Some(entry) = entries.next().await {
        writer.write(&entry).await?;
        summary.records_out += 1;
    }

    writer.flush().await?;
    Ok(summary)
}
