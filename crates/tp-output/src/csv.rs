//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `dependencies.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, DependencyRow, OutputResult, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 7] = ["tick", "frame", "agent_id", "x", "y", "root", "converged"];
pub const DEPENDENCY_HEADER: [&str; 4] = ["tick", "root", "parent_a", "parent_b"];
pub const SUMMARY_HEADER: [&str; 5] = ["tick", "converged", "active", "non_root", "promoted"];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots:    Writer<File>,
    dependencies: Writer<File>,
    summaries:    Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut dependencies = Writer::from_path(dir.join("dependencies.csv"))?;
        dependencies.write_record(DEPENDENCY_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self {
            snapshots,
            dependencies,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.frame(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                (row.root as u8).to_string(),
                (row.converged as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_dependencies(&mut self, rows: &[DependencyRow]) -> OutputResult<()> {
        for row in rows {
            self.dependencies.write_record(&[
                row.tick.to_string(),
                row.root.to_string(),
                row.parent_a.to_string(),
                row.parent_b.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.converged.to_string(),
            row.active.to_string(),
            row.non_root.to_string(),
            row.promoted.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.dependencies.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
