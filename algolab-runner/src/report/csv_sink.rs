//! CSV report sink — one file per table under an output directory.

use super::{ReportSink, SinkError};
use std::path::{Path, PathBuf};

/// Writes each table as `{name}.csv` in the output directory. Creating the
/// file truncates any previous version, which gives the overwrite
/// semantics the sink contract requires.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportSink for CsvSink {
    fn write_table(
        &self,
        name: &str,
        columns: &[&str],
        rows: &[Vec<String>],
    ) -> Result<(), SinkError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);

        let mut writer = csv::Writer::from_path(&path).map_err(|e| SinkError::WriteFailed {
            table: name.to_string(),
            reason: e.to_string(),
        })?;

        writer
            .write_record(columns)
            .map_err(|e| SinkError::WriteFailed {
                table: name.to_string(),
                reason: e.to_string(),
            })?;
        for row in rows {
            writer.write_record(row).map_err(|e| SinkError::WriteFailed {
                table: name.to_string(),
                reason: e.to_string(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}
