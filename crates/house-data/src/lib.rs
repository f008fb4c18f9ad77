//! Housing Data Cleaning Library
//!
//! Prepares raw housing records for a price-prediction model, built with Rust
//! and Polars.
//!
//! # Overview
//!
//! A run goes through four stages:
//!
//! - **Loading**: Reads the CSV and classifies each column as numeric or categorical
//! - **Imputation**: Fills numeric gaps with the median and categorical gaps with the mode
//! - **Outlier Filtering**: Drops rows whose target lies outside the IQR bounds
//! - **Writing**: Saves the cleaned CSV, creating parent directories as needed
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use house_data::{CleaningConfig, Pipeline};
//!
//! let config = CleaningConfig::builder()
//!     .input_path("data/raw/house_data.csv")
//!     .output_path("data/processed/cleaned_house_data.csv")
//!     .build()?;
//!
//! let report = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("Shape: {:?} -> {:?}", report.shape_before, report.shape_after);
//! ```
//!
//! # Working in memory
//!
//! The stages can also be used one at a time on a loaded [`Dataset`]:
//!
//! ```rust,ignore
//! use house_data::{DatasetLoader, OutlierFilter, StatisticalImputer};
//!
//! let dataset = DatasetLoader::default().load(Path::new("house_data.csv"))?;
//! let (imputed, _) = StatisticalImputer::impute(dataset)?;
//! let (cleaned, summary) = OutlierFilter::new("price").filter(imputed)?;
//! ```

pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DEFAULT_IQR_MULTIPLIER,
    DEFAULT_TARGET_COLUMN,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt, SchemaError};
pub use imputers::StatisticalImputer;
pub use loader::DatasetLoader;
pub use pipeline::{
    ClosureProgressReporter, OutlierFilter, Pipeline, PipelineBuilder, PipelineStage,
    ProgressReporter, ProgressUpdate,
};
pub use reporting::{DatasetWriter, ReportGenerator, ReportParams};
pub use types::{
    CleaningReport, ColumnKind, ColumnSchema, Dataset, FillValue, ImputationRecord,
    OutlierBounds, OutlierSummary,
};
