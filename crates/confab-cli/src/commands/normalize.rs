//! Normalize stage: raw provider JSONL → canonical JSONL

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::warn;

use confab_core::error::ConfabResult;
use confab_core::normalize;
use confab_core::record::Provider;
use confab_core::stream::{RecordReader, RecordWriter, StageSummary};

use crate::args::NormalizeArgs;

pub async fn run(args: NormalizeArgs) -> ConfabResult<()> {
    let summary = execute(&args.provider, tokio::io::stdin(), tokio::io::stdout()).await?;
    summary.log("normalize");
    Ok(())
}

async fn execute<R, W>(provider: &Provider, input: R, output: W) -> ConfabResult<StageSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = RecordReader::new(input);
    let mut writer = RecordWriter::new(output);
    let mut summary = StageSummary::default();

    while let Some((line, raw)) = reader.next_value().await? {
        summary.records_in += 1;
        match normalize::decode(provider, &raw) {
            Ok(record) => {
                writer.write(&record).await?;
                summary.records_out += 1;
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping record on line {}: {}", line, e);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    writer.flush().await?;
    summary.skipped += reader.skipped();
    Ok(summary)
}
