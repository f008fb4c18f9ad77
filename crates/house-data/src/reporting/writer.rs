//! CSV writer for cleaned datasets.

use crate::error::{CleaningError, Result};
use crate::types::Dataset;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes a [`Dataset`] to a comma-delimited file with a header row.
pub struct DatasetWriter;

impl DatasetWriter {
    /// Write `dataset` to `path`, creating parent directories as needed.
    ///
    /// The CSV is first written to a hidden sibling file and then renamed
    /// over `path`, so the destination either holds the complete output or
    /// is left as it was.
    pub fn write(dataset: &Dataset, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;

        let tmp_path = temp_path_for(path)?;
        let result = Self::write_csv(dataset, &tmp_path).and_then(|()| {
            fs::rename(&tmp_path, path).map_err(|e| CleaningError::write(path, e))
        });

        if result.is_err()
            && tmp_path.exists()
            && let Err(e) = fs::remove_file(&tmp_path)
        {
            debug!("Could not remove {}: {}", tmp_path.display(), e);
        }
        result?;

        info!("Saved processed data to {}", path.display());
        Ok(())
    }

    fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|e| CleaningError::write(path, e))?;
        let mut frame = dataset.frame().clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut frame)
            .map_err(|e| CleaningError::write(path, e))?;

        file.sync_all().map_err(|e| CleaningError::write(path, e))?;
        Ok(())
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CleaningError::write(parent, e))?;
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CleaningError::write(path, "output path has no file name"))?;
    Ok(path.with_file_name(format!(".{file_name}.tmp")))
}
