//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use tp_agent::Population;
use tp_core::Tick;
use tp_graph::Dependency;
use tp_sim::{SimObserver, SimSummary, TickStats};

use crate::row::{AgentSnapshotRow, DependencyRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records snapshot frames, dependency lists, and tick
/// summaries to any [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, stats: &TickStats) {
        let row = TickSummaryRow {
            tick:      stats.tick.0,
            converged: stats.converged as u64,
            active:    stats.active as u64,
            non_root:  stats.non_root as u64,
            promoted:  stats.promoted as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, population: &Population, dependencies: &[Dependency]) {
        let agents: Vec<AgentSnapshotRow> = population
            .iter()
            .map(|a| AgentSnapshotRow::from_agent(tick, a))
            .collect();
        let result = self.writer.write_snapshots(&agents);
        self.store_err(result);

        let deps: Vec<DependencyRow> = dependencies
            .iter()
            .map(|d| DependencyRow::from_dependency(tick, d))
            .collect();
        if !deps.is_empty() {
            let result = self.writer.write_dependencies(&deps);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _summary: &SimSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
