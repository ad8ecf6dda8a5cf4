//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentSnapshotRow, DependencyRow, OutputResult, TickSummaryRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// [`SimOutputObserver`][crate::SimOutputObserver] keeps the first error a
/// writer returns; retrieve it with `take_error` after the run.
pub trait OutputWriter {
    /// Write every agent of one snapshot frame.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write the dependency list of one snapshot frame.
    fn write_dependencies(&mut self, rows: &[DependencyRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
