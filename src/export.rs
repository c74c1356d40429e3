// File: src/export.rs
use crate::error::{AnalysisError, Result};
use crate::report::Report;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Binary,
}

impl ExportFormat {
    /// `.bin` means binary, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Self::Binary,
            _ => Self::Json,
        }
    }
}

/// Writes `report` to `path` through a temp file in the same directory,
/// so readers never see a half-written file.
pub fn save_report(report: &Report, path: &Path, format: ExportFormat) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        match format {
            ExportFormat::Json => serde_json::to_writer_pretty(&mut writer, report)?,
            ExportFormat::Binary => bincode::serialize_into(&mut writer, report)?,
        }
        writer.flush()?;
    }

    temp_file
        .persist(path)
        .map_err(|e| AnalysisError::Io(e.error))?;
    log::info!("Wrote '{}' report to {}", report.kind, path.display());
    Ok(())
}

pub fn load_report(path: &Path, format: ExportFormat) -> Result<Report> {
    let reader = BufReader::new(File::open(path)?);
    let report = match format {
        ExportFormat::Json => serde_json::from_reader(reader)?,
        ExportFormat::Binary => bincode::deserialize_from(reader)?,
    };
    Ok(report)
}
