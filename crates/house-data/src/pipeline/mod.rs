//! Pipeline module.
//!
//! This module provides the cleaning pipeline and its stage components.

mod builder;
pub mod outliers;
pub mod progress;

pub use builder::{CleanOutput, Pipeline, PipelineBuilder};
pub use outliers::OutlierFilter;
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
