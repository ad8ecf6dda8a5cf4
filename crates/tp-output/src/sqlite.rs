//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `agent_snapshots`, `dependencies`, and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, DependencyRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 tick      INTEGER NOT NULL,
                 frame     TEXT    NOT NULL,
                 agent_id  INTEGER NOT NULL,
                 x         REAL    NOT NULL,
                 y         REAL    NOT NULL,
                 root      INTEGER NOT NULL,
                 converged INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS dependencies (
                 tick     INTEGER NOT NULL,
                 root     INTEGER NOT NULL,
                 parent_a INTEGER NOT NULL,
                 parent_b INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick      INTEGER PRIMARY KEY,
                 converged INTEGER NOT NULL,
                 active    INTEGER NOT NULL,
                 non_root  INTEGER NOT NULL,
                 promoted  INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (tick, frame, agent_id, x, y, root, converged) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.frame(),
                    row.agent_id,
                    row.x,
                    row.y,
                    row.root as i64,
                    row.converged as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_dependencies(&mut self, rows: &[DependencyRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO dependencies (tick, root, parent_a, parent_b) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.root,
                    row.parent_a,
                    row.parent_b,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, converged, active, non_root, promoted) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.tick as i64,
                row.converged as i64,
                row.active as i64,
                row.non_root as i64,
                row.promoted as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
