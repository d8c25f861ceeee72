//! Render stage: canonical or cache-entry JSONL → Markdown transcript

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::warn;

use confab_core::error::{ConfabError, ConfabResult};
use confab_core::record::{CanonicalRecord, RecordKind};
use confab_core::stream::{RecordReader, StageSummary};

pub async fn run() -> ConfabResult<()> {
    let summary = execute(tokio::io::stdin(), tokio::io::stdout()).await?;
    summary.log("render");
    Ok(())
}

async fn execute<R, W>(input: R, output: W) -> ConfabResult<StageSummary>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = RecordReader::new(input);
    let mut out = BufWriter::new(output);
    let mut summary = StageSummary::default();

    while let Some((line, value)) = reader.next_value().await? {
        summary.records_in += 1;

        // Accept both bare canonical records and full cache entries, so
        // the stage renders `store` and `list` output as-is.
        let record_value = match value.get("record") {
            Some(inner) => inner.clone(),
            None => value,
        };
        let record: CanonicalRecord = match serde_json::from_value(record_value) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unrenderable record on line {}: {}", line, e);
                summary.skipped += 1;
                continue;
            }
        };

        out.write_all(render_record(&record).as_bytes())
            .await
            .map_err(|e| ConfabError::io(format!("Failed to write rendering: {e}")))?;
        summary.records_out += 1;
    }

    out.flush()
        .await
        .map_err(|e| ConfabError::io(format!("Failed to flush output: {e}")))?;
    summary.skipped += reader.skipped();
    Ok(summary)
}

fn render_record(record: &CanonicalRecord) -> String {
    let payload = &record.payload;
    match record.kind {
        RecordKind::Organization => {
            let name = payload
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(&record.id);
            format!("# {name}\n\n")
        }
        RecordKind::Conversation => {
            let title = payload
                .get("title")
                .and_then(Value::as_str)
                .filter(|title| !title.is_empty())
                .unwrap_or("(untitled)");
            let mut block = format!("## {title}\n\n");
            if let Some(summary) = payload.get("summary").and_then(Value::as_str) {
                block.push_str(&format!("> {summary}\n\n"));
            }
            block
        }
        RecordKind::Message => {
            let role = payload
                .get("role")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let text = payload.get("text").and_then(Value::as_str).unwrap_or("");
            format!("**{role}**: {text}\n\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_renders_conversation_transcript() {
        let lines = [
            json!({"kind": "conversation", "id": "c-1", "provider": "claude",
                   "contentHash": "h1",
                   "payload": {"title": "Demo chat", "summary": "About pipelines"},
                   "fetchedAt": "2024-01-01T00:00:00Z"}),
            json!({"kind": "message", "id": "m-1", "provider": "claude",
                   "parentId": "c-1", "contentHash": "h2",
                   "payload": {"role": "user", "text": "hello"},
                   "fetchedAt": "2024-01-01T00:00:00Z"}),
            json!({"kind": "message", "id": "m-2", "provider": "claude",
                   "parentId": "c-1", "contentHash": "h3",
                   "payload": {"role": "assistant", "text": "hi there"},
                   "fetchedAt": "2024-01-01T00:00:00Z"}),
        ];
        let input = lines
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let mut output = Vec::new();
        let summary = execute(input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(summary.records_out, 3);

        let markdown = String::from_utf8(output).unwrap();
        assert!(markdown.contains("## Demo chat"));
        assert!(markdown.contains("> About pipelines"));
        assert!(markdown.contains("**user**: hello"));
        assert!(markdown.contains("**assistant**: hi there"));
    }

    #[tokio::test]
    async fn test_unwraps_cache_entries() {
        let entry = json!({
            "record": {"kind": "organization", "id": "o-1", "provider": "claude",
                       "contentHash": "h", "payload": {"name": "Acme"},
                       "fetchedAt": "2024-01-01T00:00:00Z"},
            "storedAt": "2024-01-01T00:00:00Z",
            "lastVerifiedAt": "2024-01-01T00:00:00Z",
            "ttlPolicy": "15m",
        });

        let input = format!("{entry}\n");
        let mut output = Vec::new();
        execute(input.as_bytes(), &mut output).await.unwrap();

        let markdown = String::from_utf8(output).unwrap();
        assert_eq!(markdown, "# Acme\n\n");
    }

    #[tokio::test]
    async fn test_untitled_conversation_gets_placeholder() {
        let line = json!({"kind": "conversation", "id": "c-1", "provider": "claude",
                          "contentHash": "h", "payload": {"title": ""},
                          "fetchedAt": "2024-01-01T00:00:00Z"});
        let input = format!("{line}\n");
        let mut output = Vec::new();
        execute(input.as_bytes(), &mut output).await.unwrap();

        let markdown = String::from_utf8(output).unwrap();
        assert!(markdown.contains("## (untitled)"));
    }

    #[tokio::test]
    async fn test_skips_unrenderable_lines() {
        let input = "{\"not\": \"a record\"}\n";
        let mut output = Vec::new();
        let summary = execute(input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(summary.records_out, 0);
        assert_eq!(summary.skipped, 1);
        assert!(output.is_empty());
    }
}
