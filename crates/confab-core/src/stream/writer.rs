//! Line-oriented JSON writer

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::error::{ConfabError, ConfabResult};

/// Writes one serialized value per line through a buffer.
///
/// Callers must [`flush`](Self::flush) after the last write; dropping
/// the writer discards anything still buffered.
pub struct RecordWriter<W> {
    out: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
        }
    }

    /// Serialize `value` and write it as a single line.
    pub async fn write<T: Serialize>(&mut self, value: &T) -> ConfabResult<()> {
        let json = serde_json::to_string(value)?;

        let mut line = String::with_capacity(json.len() + 1);
        line.push_str(&json);
        line.push('\n');

        self.out
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ConfabError::io(format!("Failed to write record: {e}")))
    }

    pub async fn flush(&mut self) -> ConfabResult<()> {
        self.out
            .flush()
            .await
            .map_err(|e| ConfabError::io(format!("Failed to flush output: {e}")))
    }
}
