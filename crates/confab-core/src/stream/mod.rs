//! JSONL stream plumbing shared by every pipeline stage
//!
//! Stages read one JSON value per line from stdin and write one record
//! per line to stdout; everything else (diagnostics, summaries) goes to
//! stderr via tracing. A malformed line is skipped and counted, never
//! fatal; an unreadable stream is.

mod reader;
mod stage;
mod writer;

pub use reader::RecordReader;
pub use stage::StageSummary;
pub use writer::RecordWriter;
