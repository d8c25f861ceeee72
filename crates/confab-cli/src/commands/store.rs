//! Store stage: canonical JSONL → cache → cache-entry JSONL

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::warn;

use confab_core::cache::CacheStore;
use confab_core::error::ConfabResult;
use confab_core::record::CanonicalRecord;
use confab_core::stream::{RecordReader, RecordWriter, StageSummary};

use crate::args::StoreArgs;

pub async fn run(args: StoreArgs) -> ConfabResult<()> {
    let store = CacheStore::open(args.cache.store_config()?)?;
    let summary = execute(&store, tokio::io::stdin(), tokio::io::stdout()).await?;
    summary.log("store");
    Ok(())
}

async fn execute<R, W>(store: &CacheStore, input: R, output: W) -> ConfabResult<StageSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = RecordReader::new(input);
    let mut writer = RecordWriter::new(output);
    let mut summary = StageSummary::default();

    while let Some((line, value)) = reader.next_value().await? {
        summary.records_in += 1;

        let record: CanonicalRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping non-canonical record on line {}: {}", line, e);
                summary.skipped += 1;
                continue;
            }
        };

        // A failing write is fatal; a skipped record is not.
        let entry = store.put(record).await?;
        writer.write(&entry).await?;
        summary.records_out += 1;
    }

    writer.flush().await?;
    summary.skipped += reader.skipped();
    Ok(summary)
}
