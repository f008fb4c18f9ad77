//! Output module.
//!
//! Persists the cleaned dataset as CSV and, optionally, a JSON report
//! describing what the run changed.
//!
//! # Example
//!
//! ```rust,ignore
//! use house_data::reporting::{DatasetWriter, ReportGenerator};
//!
//! DatasetWriter::write(&dataset, Path::new("data/processed/cleaned_house_data.csv"))?;
//! ReportGenerator::write_report(&report, Path::new("data/processed/report.json"))?;
//! ```

mod generator;
mod writer;

pub use generator::{ReportGenerator, ReportParams};
pub use writer::DatasetWriter;
