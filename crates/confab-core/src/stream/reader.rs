//! Line-oriented JSON reader

use futures::StreamExt;
use serde_json::Value;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::warn;

use crate::error::{ConfabError, ConfabResult};

/// Reads one JSON value per line, skipping what it cannot parse.
///
/// Blank lines are ignored silently. A line that is not valid JSON is
/// counted and reported on stderr, then skipped; only a failure of the
/// underlying stream is returned as an error.
pub struct RecordReader<R> {
    lines: FramedRead<R, LinesCodec>,
    lines_seen: u64,
    skipped: u64,
}

impl<R: AsyncRead + Unpin> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new()),
            lines_seen: 0,
            skipped: 0,
        }
    }

    /// Next parsed value with its 1-based line number, or `Ok(None)` at
    /// end of input.
    pub async fn next_value(&mut self) -> ConfabResult<Option<(u64, Value)>> {
        while let Some(line) = self.lines.next().await {
            let line =
                line.map_err(|e| ConfabError::io(format!("Failed to read input: {e}")))?;
            self.lines_seen += 1;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(value) => return Ok(Some((self.lines_seen, value))),
                Err(e) => {
                    self.skipped += 1;
                    warn!(
                        "Skipping malformed JSON on line {}: {} ({})",
                        self.lines_seen,
                        e,
                        preview(&line)
                    );
                }
            }
        }
        Ok(None)
    }

    /// Physical lines consumed so far, blank lines included.
    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// Lines dropped because they were not valid JSON.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

// Char-based so truncation never lands inside a multi-byte sequence.
fn preview(line: &str) -> String {
    line.chars().take(80).collect()
}
