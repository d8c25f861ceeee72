//! Per-stage counters

use tracing::info;

/// What a stage did with its input, reported on stderr at exit.
///
/// `records_in` counts JSON values consumed, `records_out` values
/// emitted, `skipped` everything dropped along the way (unparseable
/// lines and records rejected per-record).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub records_in: u64,
    pub records_out: u64,
    pub skipped: u64,
}

impl StageSummary {
    pub fn log(&self, stage: &str) {
        info!(
            "{} finished: {} in, {} out, {} skipped",
            stage, self.records_in, self.records_out, self.skipped
        );
    }
}
