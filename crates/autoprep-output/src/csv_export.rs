use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::debug;

use autoprep_common::any_to_string;
use autoprep_core::ProcessedArtifacts;
use autoprep_model::Diagnostics;

pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";

/// `X_train` -> `X_train.csv`.
pub fn artifact_file_name(name: &str) -> String {
    format!("{name}.csv")
}

fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))
}

/// Write every artifact of the run into `output_dir`.
///
/// Returns the written paths in export order.
pub fn write_artifacts(output_dir: &Path, artifacts: &ProcessedArtifacts) -> Result<Vec<PathBuf>> {
    ensure_output_dir(output_dir)?;
    let mut outputs = Vec::new();
    for (name, frame) in artifacts.named() {
        let path = output_dir.join(artifact_file_name(name));
        write_frame_csv(&path, frame).with_context(|| format!("write {name}"))?;
        outputs.push(path);
    }
    Ok(outputs)
}

/// Write one frame as CSV: header of column names, then one row per record.
pub fn write_frame_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_frame(BufWriter::new(file), frame)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "artifact written"
    );
    Ok(())
}

fn write_frame<W: Write>(writer: W, frame: &DataFrame) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let header: Vec<&str> = frame
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    csv.write_record(&header)?;
    let columns = frame.get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for idx in 0..frame.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(idx)?));
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the diagnostics bundle as pretty JSON.
pub fn write_diagnostics(output_dir: &Path, diagnostics: &Diagnostics) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let path = output_dir.join(DIAGNOSTICS_FILE);
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), diagnostics)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
