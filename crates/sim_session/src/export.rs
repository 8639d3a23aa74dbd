//! CSV export of the committed paths.
//!
//! The artifact is a comment header describing the run, followed by one CSV
//! row per path point:
//!
//! ```text
//! # Fractional Brownian Motion paths
//! # Generated: 2026-10-17T09:30:00.000Z
//! # Hurst: 0.7
//! # NumPoints: 512
//! # TimeLength: 2
//! time,path1,path2,path3
//! 0,0,0,0
//! ...
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use sim_core::{ExportError, GenerationResult, SimulationParameters};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// First header line of every artifact.
pub const EXPORT_TITLE: &str = "Fractional Brownian Motion paths";

/// CSV column names.
pub const CSV_COLUMNS: [&str; 4] = ["time", "path1", "path2", "path3"];

/// A rendered export, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name (`fbm_paths_H<hurst>_<date>.csv`).
    pub file_name: String,
    /// Full file content.
    pub content: String,
    /// Time stamped into the header.
    pub generated_at: DateTime<Utc>,
    /// Id of the exported request.
    pub request_id: u64,
}

impl ExportArtifact {
    /// Write the artifact into `dir`, creating the directory if needed.
    ///
    /// Returns the path of the written file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)?;

        info!(
            path = %path.display(),
            bytes = self.content.len(),
            request_id = self.request_id,
            "Export written"
        );
        Ok(path)
    }
}

/// Renders committed results as CSV artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter;

impl Exporter {
    /// Create an exporter.
    pub fn new() -> Self {
        Self
    }

    /// Export the committed result, stamped with `timestamp`.
    ///
    /// The header uses the parameters the result was generated with, not
    /// whatever the session currently holds.
    pub fn export_at(
        &self,
        committed: Option<&GenerationResult>,
        timestamp: DateTime<Utc>,
    ) -> Result<ExportArtifact, ExportError> {
        let result = committed.ok_or(ExportError::NoData)?;
        let parameters = result.parameters();

        let mut content = Self::header(parameters, timestamp);
        content.push_str(&Self::rows(result)?);

        Ok(ExportArtifact {
            file_name: Self::file_name(parameters, timestamp),
            content,
            generated_at: timestamp,
            request_id: result.request.id,
        })
    }

    /// File name for an export of `parameters` made at `timestamp`.
    pub fn file_name(parameters: &SimulationParameters, timestamp: DateTime<Utc>) -> String {
        format!(
            "fbm_paths_H{:.2}_{}.csv",
            parameters.hurst,
            timestamp.format("%Y-%m-%d")
        )
    }

    fn header(parameters: &SimulationParameters, timestamp: DateTime<Utc>) -> String {
        format!(
            "# {}\n# Generated: {}\n# Hurst: {}\n# NumPoints: {}\n# TimeLength: {}\n",
            EXPORT_TITLE,
            timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            parameters.hurst,
            parameters.num_points,
            parameters.time_length,
        )
    }

    fn rows(result: &GenerationResult) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(CSV_COLUMNS)
            .map_err(|e| ExportError::Csv(e.to_string()))?;

        for point in result.series().points() {
            let [p1, p2, p3] = point.values;
            writer
                .write_record([
                    point.time.to_string(),
                    p1.to_string(),
                    p2.to_string(),
                    p3.to_string(),
                ])
                .map_err(|e| ExportError::Csv(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
    }
}
