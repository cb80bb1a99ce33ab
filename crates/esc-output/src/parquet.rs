//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.parquet`
//! - `tick_summaries.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{BooleanBuilder, Float32Builder, Float64Builder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("pair",     DataType::UInt32,  false),
        Field::new("agent",    DataType::UInt32,  false),
        Field::new("tick",     DataType::UInt64,  false),
        Field::new("t",        DataType::Float64, false),
        Field::new("x",        DataType::Float32, false),
        Field::new("y",        DataType::Float32, false),
        Field::new("z",        DataType::Float32, false),
        Field::new("vx",       DataType::Float32, false),
        Field::new("vy",       DataType::Float32, false),
        Field::new("vz",       DataType::Float32, false),
        Field::new("on_stair", DataType::Boolean, false),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",           DataType::UInt64,  false),
        Field::new("t",              DataType::Float64, false),
        Field::new("dt",             DataType::Float32, false),
        Field::new("finished",       DataType::UInt64,  false),
        Field::new("finished_total", DataType::UInt64,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    snapshots:   Option<ArrowWriter<File>>,
    summaries:   Option<ArrowWriter<File>>,
    snap_schema: Arc<Schema>,
    summ_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let snap_schema = snapshot_schema();
        let summ_schema = summary_schema();

        let snap_file = File::create(dir.join("agent_snapshots.parquet"))?;
        let snapshots =
            ArrowWriter::try_new(snap_file, Arc::clone(&snap_schema), Some(snappy_props()))?;

        let summ_file = File::create(dir.join("tick_summaries.parquet"))?;
        let summaries =
            ArrowWriter::try_new(summ_file, Arc::clone(&summ_schema), Some(snappy_props()))?;

        Ok(Self {
            snapshots: Some(snapshots),
            summaries: Some(summaries),
            snap_schema,
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

        let mut pairs     = UInt32Builder::new();
        let mut agents    = UInt32Builder::new();
        let mut ticks     = UInt64Builder::new();
        let mut times     = Float64Builder::new();
        // x, y, z, vx, vy, vz
        let mut kinematic: [Float32Builder; 6] = std::array::from_fn(|_| Float32Builder::new());
        let mut on_stair  = BooleanBuilder::new();

        for row in rows {
            pairs.append_value(row.pair);
            agents.append_value(row.agent);
            ticks.append_value(row.tick);
            times.append_value(row.t);
            let values = row.position.into_iter().chain(row.velocity);
            for (column, value) in kinematic.iter_mut().zip(values) {
                column.append_value(value);
            }
            on_stair.append_value(row.on_stair);
        }

        let mut columns: Vec<arrow::array::ArrayRef> = vec![
            Arc::new(pairs.finish()),
            Arc::new(agents.finish()),
            Arc::new(ticks.finish()),
            Arc::new(times.finish()),
        ];
        columns.extend(
            kinematic
                .iter_mut()
                .map(|c| Arc::new(c.finish()) as arrow::array::ArrayRef),
        );
        columns.push(Arc::new(on_stair.finish()));

        let batch = RecordBatch::try_new(Arc::clone(&self.snap_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let mut ticks    = UInt64Builder::new();
        let mut times    = Float64Builder::new();
        let mut dts      = Float32Builder::new();
        let mut finished = UInt64Builder::new();
        let mut totals   = UInt64Builder::new();

        ticks.append_value(row.tick);
        times.append_value(row.t);
        dts.append_value(row.dt);
        finished.append_value(row.finished);
        totals.append_value(row.finished_total);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summ_schema),
            vec![
                Arc::new(ticks.finish()),
                Arc::new(times.finish()),
                Arc::new(dts.finish()),
                Arc::new(finished.finish()),
                Arc::new(totals.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.snapshots.take() {
            w.close()?;
        }
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        Ok(())
    }
}
