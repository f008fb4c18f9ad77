//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating Load -> Impute -> Filter -> Write.

use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::{CleaningError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::loader::DatasetLoader;
use crate::pipeline::outliers::OutlierFilter;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{DatasetWriter, ReportGenerator, ReportParams};
use crate::types::{CleaningReport, Dataset, ImputationRecord, OutlierSummary};
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Cleaned dataset plus the diagnostic records of the in-memory stages.
pub type CleanOutput = (Dataset, Vec<ImputationRecord>, OutlierSummary);

/// The cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use house_data::{CleaningConfig, Pipeline};
///
/// let config = CleaningConfig::builder()
///     .input_path("data/raw/house_data.csv")
///     .output_path("data/processed/cleaned_house_data.csv")
///     .build()?;
///
/// let report = Pipeline::builder()
///     .config(config)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .run()?;
///
/// println!("{} rows written", report.shape_after.0);
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    loader: DatasetLoader,
    outlier_filter: OutlierFilter,
}

// Hosts may move a configured pipeline onto a worker thread.
static_assertions::assert_impl_all!(Pipeline: Send);
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the whole pipeline and write the cleaned file.
    ///
    /// Nothing is written at the output path unless every stage succeeds.
    pub fn run(&self) -> Result<CleaningReport> {
        match self.run_internal() {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Impute and filter an already loaded dataset, without touching disk.
    pub fn clean(&self, dataset: Dataset) -> Result<CleanOutput> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Imputation,
            0.0,
            "Handling missing values...",
        ));
        info!("Step 2: Handling missing values...");
        let (imputed, imputations) =
            StatisticalImputer::impute(dataset).context("Imputation failed")?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Imputation,
            1.0,
            format!("Imputed {} columns", imputations.len()),
        ));

        self.report_progress(ProgressUpdate::new(
            PipelineStage::OutlierFiltering,
            0.0,
            format!("Filtering outliers in '{}'...", self.config.target_column),
        ));
        info!(
            "Step 3: Filtering outliers in {}...",
            self.config.target_column
        );
        let (filtered, outliers) = self
            .outlier_filter
            .filter(imputed)
            .context("Outlier filtering failed")?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::OutlierFiltering,
            1.0,
            format!("Removed {} rows", outliers.rows_removed),
        ));

        Ok((filtered, imputations, outliers))
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self) -> Result<CleaningReport> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Loading {}...", self.config.input_path.display()),
        ));
        info!("Step 1: Loading dataset...");
        let dataset = self.loader.load(&self.config.input_path)?;
        let shape_before = dataset.shape();
        let columns = dataset.columns().to_vec();
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", shape_before.0, shape_before.1),
        ));

        let (cleaned, imputations, outliers) = self.clean(dataset)?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Writing,
            0.0,
            format!("Writing {}...", self.config.output_path.display()),
        ));

        let report = ReportGenerator::build_report(ReportParams {
            input_file: &self.config.input_path,
            output_file: &self.config.output_path,
            target_column: &self.config.target_column,
            shape_before,
            columns: &columns,
            imputations,
            outliers,
            elapsed: start_time.elapsed(),
        });

        // The cleaned CSV is committed last: a failed report leaves no output
        if let Some(report_path) = &self.config.report_path {
            ReportGenerator::write_report(&report, report_path)?;
        }

        info!("Step 4: Saving processed data...");
        if let Err(e) = DatasetWriter::write(&cleaned, &self.config.output_path) {
            if let Some(report_path) = &self.config.report_path
                && let Err(remove_err) = fs::remove_file(report_path)
            {
                debug!("Could not remove {}: {}", report_path.display(), remove_err);
            }
            return Err(e);
        }

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Writing,
            1.0,
            format!("Wrote {} rows", report.shape_after.0),
        ));

        info!(
            "Cleaning finished in {}ms: {:?} -> {:?}",
            report.duration_ms, report.shape_before, report.shape_after
        );
        Ok(report)
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the run configuration. Required.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Forward progress updates to a custom reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Forward progress updates to a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self
            .config
            .ok_or(CleaningError::InvalidConfig(ConfigValidationError::MissingConfig))?;
        config.validate()?;

        Ok(Pipeline {
            loader: DatasetLoader::from_config(&config),
            outlier_filter: OutlierFilter::from_config(&config),
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;
    use polars::prelude::*;
    use std::sync::Mutex;

    fn config() -> CleaningConfig {
        CleaningConfig::builder()
            .input_path("unused.csv")
            .output_path("unused_out.csv")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_requires_config() {
        let result = Pipeline::builder().build();
        assert!(matches!(
            result,
            Err(CleaningError::InvalidConfig(
                ConfigValidationError::MissingConfig
            ))
        ));
    }

    #[test]
    fn test_build_revalidates_config() {
        let mut config = config();
        config.iqr_multiplier = -1.0;
        let result = Pipeline::builder().config(config).build();
        assert!(matches!(
            result,
            Err(CleaningError::InvalidConfig(
                ConfigValidationError::InvalidIqrMultiplier(_)
            ))
        ));
    }

    #[test]
    fn test_clean_in_memory() {
        let df = df![
            "price" => [Some(100.0), Some(102.0), None, Some(101.0), Some(99.0), Some(1_000_000.0), Some(100.0)],
            "location" => [Some("Urban"), None, Some("Rural"), Some("Urban"), Some("Urban"), Some("Rural"), None],
        ]
        .unwrap();
        let dataset = Dataset::from_frame(df).unwrap();

        let pipeline = Pipeline::builder().config(config()).build().unwrap();
        let (cleaned, imputations, outliers) = pipeline.clean(dataset).unwrap();

        assert_eq!(cleaned.total_missing(), 0);
        assert_eq!(imputations.len(), 2);
        assert_eq!(imputations[0].kind, ColumnKind::Numeric);
        assert_eq!(outliers.rows_removed, 1);
        assert_eq!(cleaned.height(), 6);
    }

    #[test]
    fn test_progress_reports_each_stage() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);
        let pipeline = Pipeline::builder()
            .config(config())
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();

        let dataset = Dataset::from_frame(df!["price" => [1.0, 2.0, 3.0]].unwrap()).unwrap();
        pipeline.clean(dataset).unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                PipelineStage::Imputation,
                PipelineStage::Imputation,
                PipelineStage::OutlierFiltering,
                PipelineStage::OutlierFiltering,
            ]
        );
    }

    #[test]
    fn test_run_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = CleaningConfig::builder()
            .input_path(dir.path().join("absent.csv"))
            .output_path(dir.path().join("out.csv"))
            .build()
            .unwrap();

        let last = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last);
        let pipeline = Pipeline::builder()
            .config(config)
            .on_progress(move |update| *sink.lock().unwrap() = Some(update.stage))
            .build()
            .unwrap();

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        assert_eq!(*last.lock().unwrap(), Some(PipelineStage::Failed));
        assert!(!dir.path().join("out.csv").exists());
    }
}
