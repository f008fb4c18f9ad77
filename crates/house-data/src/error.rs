//! Error types for the cleaning pipeline.
//!
//! Every failure maps onto one of three user-facing categories: the input
//! could not be loaded, the data does not fit the expected schema, or the
//! output could not be written. All of them abort the run.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// Schema violations detected while loading or processing a dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The required target column is not present.
    #[error("Target column '{0}' not found in dataset")]
    MissingTarget(String),

    /// The target column was loaded as categorical.
    #[error("Target column '{0}' must be numeric")]
    NonNumericTarget(String),

    /// No kind could be inferred because the column has no values at all.
    #[error("Cannot infer a kind for column '{0}': every value is missing")]
    AmbiguousKind(String),

    /// A column was accessed as a kind other than the one it was loaded with.
    #[error("Column '{column}' is {actual}, not {expected}")]
    KindMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// A column name is not part of the dataset schema.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The target still holds missing values when bounds are computed.
    #[error("Target column '{column}' still has {count} missing values")]
    MissingTargetValues { column: String, count: usize },
}

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The input file is missing or is not readable as CSV.
    #[error("Failed to load '{}': {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// The dataset violates the expected schema.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The output could not be persisted.
    #[error("Failed to write '{}': {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Build a load error from any displayable cause.
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a write error from any displayable cause.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, suitable for scripts wrapping the CLI.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Write { .. } => "WRITE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a schema violation, looking through context.
    pub fn is_schema_error(&self) -> bool {
        match self {
            Self::Schema(_) => true,
            Self::WithContext { source, .. } => source.is_schema_error(),
            _ => false,
        }
    }
}

/// Errors serialize as `{ "code", "message" }` so they can be embedded in reports.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
