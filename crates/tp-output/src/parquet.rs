//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `agent_snapshots.parquet`
//! - `dependencies.parquet`
//! - `tick_summaries.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, DependencyRow, OutputResult, TickSummaryRow};

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",      DataType::UInt64,  false),
        Field::new("frame",     DataType::Utf8,    false),
        Field::new("agent_id",  DataType::UInt32,  false),
        Field::new("x",         DataType::Float64, false),
        Field::new("y",         DataType::Float64, false),
        Field::new("root",      DataType::Boolean, false),
        Field::new("converged", DataType::Boolean, false),
    ]))
}

fn dependency_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",     DataType::UInt64, false),
        Field::new("root",     DataType::UInt32, false),
        Field::new("parent_a", DataType::UInt32, false),
        Field::new("parent_b", DataType::UInt32, false),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",      DataType::UInt64, false),
        Field::new("converged", DataType::UInt64, false),
        Field::new("active",    DataType::UInt64, false),
        Field::new("non_root",  DataType::UInt64, false),
        Field::new("promoted",  DataType::UInt64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes simulation output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    snapshots:    Option<ArrowWriter<File>>,
    dependencies: Option<ArrowWriter<File>>,
    summaries:    Option<ArrowWriter<File>>,
    snap_schema:  Arc<Schema>,
    dep_schema:   Arc<Schema>,
    summ_schema:  Arc<Schema>,
}

impl ParquetWriter {
    /// Create all three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let snap_schema = snapshot_schema();
        let dep_schema = dependency_schema();
        let summ_schema = summary_schema();

        Ok(Self {
            snapshots:    Some(open(dir, "agent_snapshots.parquet", &snap_schema)?),
            dependencies: Some(open(dir, "dependencies.parquet", &dep_schema)?),
            summaries:    Some(open(dir, "tick_summaries.parquet", &summ_schema)?),
            snap_schema,
            dep_schema,
            summ_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.snapshots.as_mut() else {
            return Ok(());
        };

        let mut ticks     = UInt64Builder::new();
        let mut frames    = StringBuilder::new();
        let mut agent_ids = UInt32Builder::new();
        let mut xs        = Float64Builder::new();
        let mut ys        = Float64Builder::new();
        let mut roots     = BooleanBuilder::new();
        let mut converged = BooleanBuilder::new();

        for row in rows {
            ticks.append_value(row.tick);
            frames.append_value(row.frame());
            agent_ids.append_value(row.agent_id);
            xs.append_value(row.x);
            ys.append_value(row.y);
            roots.append_value(row.root);
            converged.append_value(row.converged);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(ticks.finish()),
            Arc::new(frames.finish()),
            Arc::new(agent_ids.finish()),
            Arc::new(xs.finish()),
            Arc::new(ys.finish()),
            Arc::new(roots.finish()),
            Arc::new(converged.finish()),
        ];
        let batch = RecordBatch::try_new(Arc::clone(&self.snap_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_dependencies(&mut self, rows: &[DependencyRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.dependencies.as_mut() else {
            return Ok(());
        };

        let mut ticks     = UInt64Builder::new();
        let mut roots     = UInt32Builder::new();
        let mut parents_a = UInt32Builder::new();
        let mut parents_b = UInt32Builder::new();

        for row in rows {
            ticks.append_value(row.tick);
            roots.append_value(row.root);
            parents_a.append_value(row.parent_a);
            parents_b.append_value(row.parent_b);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(ticks.finish()),
            Arc::new(roots.finish()),
            Arc::new(parents_a.finish()),
            Arc::new(parents_b.finish()),
        ];
        let batch = RecordBatch::try_new(Arc::clone(&self.dep_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let column = |v: u64| -> ArrayRef {
            let mut b = UInt64Builder::new();
            b.append_value(v);
            Arc::new(b.finish())
        };
        let batch = RecordBatch::try_new(
            Arc::clone(&self.summ_schema),
            vec![
                column(row.tick),
                column(row.converged),
                column(row.active),
                column(row.non_root),
                column(row.promoted),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for slot in [&mut self.snapshots, &mut self.dependencies, &mut self.summaries] {
            if let Some(w) = slot.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
