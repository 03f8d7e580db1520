//! Tabular export of pipeline results.
//!
//! Rows are written side by side as delimited text and as JSON, under file
//! names that embed the generation time so earlier runs are never
//! overwritten.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::anomaly::AnomalyRecord;
use crate::summary::DocumentRow;
use crate::PipelineError;

pub const DEFAULT_OUT_DIR: &str = "results";
pub const DEFAULT_RESULTS_BASE: &str = "clustering_results";
pub const DEFAULT_ANOMALIES_BASE: &str = "anomalies";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    pub results_base: String,
    pub anomalies_base: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            results_base: DEFAULT_RESULTS_BASE.to_string(),
            anomalies_base: DEFAULT_ANOMALIES_BASE.to_string(),
        }
    }
}

/// A record that can be written as one line of a delimited table.
pub trait TabularRow: Serialize {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

impl TabularRow for DocumentRow {
    fn header() -> &'static [&'static str] {
        &["filepath", "cluster"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.filepath.clone(), self.cluster.to_string()]
    }
}

impl TabularRow for AnomalyRecord {
    fn header() -> &'static [&'static str] {
        &["filepath", "cluster", "cohesion", "mean_affinity", "suspect"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.filepath.clone(),
            self.cluster.to_string(),
            self.cohesion.to_string(),
            self.mean_affinity.to_string(),
            self.suspect.to_string(),
        ]
    }
}

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn export_err(path: &Path, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Export {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// `<base>_<YYYYMMDD_HHMMSS>` for the given instant.
pub fn timestamped_stem(base: &str, at: &DateTime<Local>) -> String {
    format!("{base}_{}", at.format(TIMESTAMP_FORMAT))
}

fn write_csv<R: TabularRow>(path: &Path, rows: &[R]) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| export_err(path, e))?;
    let mut out = BufWriter::new(file);
    let header: Vec<String> = R::header().iter().map(|h| csv_field(h)).collect();
    writeln!(out, "{}", header.join(",")).map_err(|e| export_err(path, e))?;
    for row in rows {
        let line: Vec<String> = row.fields().iter().map(|f| csv_field(f)).collect();
        writeln!(out, "{}", line.join(",")).map_err(|e| export_err(path, e))?;
    }
    out.flush().map_err(|e| export_err(path, e))
}

fn write_json<R: Serialize>(path: &Path, rows: &[R]) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| export_err(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, rows).map_err(|e| export_err(path, e))?;
    out.flush().map_err(|e| export_err(path, e))
}

/// Write `rows` to `dir` as `<base>_<timestamp>.csv` and `.json`, stamped
/// with `at`. The directory is created if missing.
pub fn write_results_at<R: TabularRow>(
    dir: &Path,
    base: &str,
    rows: &[R],
    at: &DateTime<Local>,
) -> Result<ExportedFiles, PipelineError> {
    fs::create_dir_all(dir).map_err(|e| export_err(dir, e))?;
    let stem = timestamped_stem(base, at);
    let files = ExportedFiles {
        csv: dir.join(format!("{stem}.csv")),
        json: dir.join(format!("{stem}.json")),
    };
    write_csv(&files.csv, rows)?;
    write_json(&files.json, rows)?;
    info!(
        rows = rows.len(),
        csv = %files.csv.display(),
        json = %files.json.display(),
        "results_exported"
    );
    Ok(files)
}

/// [`write_results_at`] stamped with the current local time.
pub fn write_results<R: TabularRow>(
    dir: &Path,
    base: &str,
    rows: &[R],
) -> Result<ExportedFiles, PipelineError> {
    write_results_at(dir, base, rows, &Local::now())
}
