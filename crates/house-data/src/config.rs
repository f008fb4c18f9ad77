//! Configuration for a cleaning run.
//!
//! Use [`CleaningConfig::builder()`] to assemble a configuration; `build()`
//! validates it before any file is touched.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the column the downstream model predicts.
pub const DEFAULT_TARGET_COLUMN: &str = "price";

/// Tukey fence multiplier applied to the interquartile range.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Configuration for the cleaning pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use house_data::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .input_path("data/raw/house_data.csv")
///     .output_path("data/processed/cleaned_house_data.csv")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// CSV file to read.
    pub input_path: PathBuf,

    /// Destination for the cleaned CSV. Parent directories are created.
    pub output_path: PathBuf,

    /// Column that is required, must be numeric, and is outlier-filtered.
    /// Default: "price"
    pub target_column: String,

    /// Extra field values treated as missing in addition to empty fields.
    /// Default: none
    pub null_values: Vec<String>,

    /// Multiplier k for the `[Q1 - k*IQR, Q3 + k*IQR]` bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Optional path for a JSON report of the run.
    /// Default: None
    pub report_path: Option<PathBuf>,
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingPath("input_path"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingPath("output_path"));
        }

        if self.input_path == self.output_path {
            return Err(ConfigValidationError::OutputOverwritesInput(
                self.input_path.clone(),
            ));
        }

        if self.target_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTargetColumn);
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("No configuration provided; call .config(...) before .build()")]
    MissingConfig,

    #[error("Missing required path '{0}'")]
    MissingPath(&'static str),

    #[error("Output path '{}' is the same as the input path", .0.display())]
    OutputOverwritesInput(PathBuf),

    #[error("Target column name must not be empty")]
    EmptyTargetColumn,

    #[error("Invalid IQR multiplier: {0} (must be a finite number greater than 0)")]
    InvalidIqrMultiplier(f64),
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    target_column: Option<String>,
    null_values: Vec<String>,
    iqr_multiplier: Option<f64>,
    report_path: Option<PathBuf>,
}

impl CleaningConfigBuilder {
    /// Set the CSV file to read.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the destination of the cleaned CSV.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the target column (defaults to `price`).
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Treat `marker` as a missing value. May be called repeatedly.
    pub fn null_value(mut self, marker: impl Into<String>) -> Self {
        self.null_values.push(marker.into());
        self
    }

    /// Replace the whole list of missing-value markers.
    pub fn null_values<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the IQR multiplier used for outlier bounds.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Write a JSON report of the run to `path`.
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            input_path: self
                .input_path
                .ok_or(ConfigValidationError::MissingPath("input_path"))?,
            output_path: self
                .output_path
                .ok_or(ConfigValidationError::MissingPath("output_path"))?,
            target_column: self
                .target_column
                .unwrap_or_else(|| DEFAULT_TARGET_COLUMN.to_string()),
            null_values: self.null_values,
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            report_path: self.report_path,
        };

        config.validate()?;
        Ok(config)
    }
}
