//! CSV loading.
//!
//! Reads a comma-delimited file with a header row into a [`Dataset`] and
//! checks that the target column can be used for outlier filtering.

use crate::config::{CleaningConfig, DEFAULT_TARGET_COLUMN};
use crate::error::{CleaningError, Result, SchemaError};
use crate::types::{ColumnKind, Dataset};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Loads housing records from CSV.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    target_column: String,
    null_values: Vec<String>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            null_values: Vec::new(),
        }
    }
}

impl DatasetLoader {
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            null_values: Vec::new(),
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self {
            target_column: config.target_column.clone(),
            null_values: config.null_values.clone(),
        }
    }

    /// Treat these field values as missing, in addition to empty fields.
    pub fn with_null_values(mut self, markers: Vec<String>) -> Self {
        self.null_values = markers;
        self
    }

    /// Read `path` and infer column kinds over every row.
    ///
    /// # Errors
    ///
    /// - `Load` if the file is missing, unreadable, not CSV, or has no data rows.
    /// - `Schema` if a column has no values at all, or the target column is
    ///   absent or not numeric.
    pub fn load(&self, path: &Path) -> Result<Dataset> {
        info!("Loading data from {}", path.display());

        if !path.is_file() {
            return Err(CleaningError::load(path, "file does not exist"));
        }

        let mut parse_options = CsvParseOptions::default().with_quote_char(Some(b'"'));
        if !self.null_values.is_empty() {
            let markers = self.null_values.iter().map(|s| s.as_str().into()).collect();
            parse_options = parse_options.with_null_values(Some(NullValues::AllColumns(markers)));
        }

        // Scan the whole file so a late non-numeric value makes the column categorical
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(parse_options)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| CleaningError::load(path, e))?;

        if frame.width() == 0 {
            return Err(CleaningError::load(path, "no columns found"));
        }
        if frame.height() == 0 {
            return Err(CleaningError::load(path, "no data rows found"));
        }

        let dataset = Dataset::from_frame(frame)?;
        for col in dataset.columns() {
            debug!("  {}: {}", col.name, col.kind);
        }

        self.check_target(&dataset)?;

        info!("Loaded data with shape: {:?}", dataset.shape());
        Ok(dataset)
    }

    fn check_target(&self, dataset: &Dataset) -> Result<()> {
        match dataset.kind_of(&self.target_column) {
            Ok(ColumnKind::Numeric) => Ok(()),
            Ok(ColumnKind::Categorical) => {
                Err(SchemaError::NonNumericTarget(self.target_column.clone()).into())
            }
            Err(_) => Err(SchemaError::MissingTarget(self.target_column.clone()).into()),
        }
    }
}
