use crate::error::{CleaningError, Result};
use crate::reporting::writer::ensure_parent_dir;
use crate::types::{CleaningReport, ColumnSchema, ImputationRecord, OutlierSummary};
use chrono::Local;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Inputs collected by the pipeline for a [`CleaningReport`].
pub struct ReportParams<'a> {
    pub input_file: &'a Path,
    pub output_file: &'a Path,
    pub target_column: &'a str,
    pub shape_before: (usize, usize),
    pub columns: &'a [ColumnSchema],
    pub imputations: Vec<ImputationRecord>,
    pub outliers: OutlierSummary,
    pub elapsed: Duration,
}

/// Assembles and saves run reports.
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn build_report(params: ReportParams<'_>) -> CleaningReport {
        CleaningReport {
            generated_at: Local::now().to_rfc3339(),
            input_file: params.input_file.display().to_string(),
            output_file: params.output_file.display().to_string(),
            target_column: params.target_column.to_string(),
            shape_before: params.shape_before,
            shape_after: params.outliers.shape_after,
            columns: params.columns.to_vec(),
            imputations: params.imputations,
            outliers: params.outliers,
            duration_ms: params.elapsed.as_millis() as u64,
        }
    }

    /// Write `report` as pretty-printed JSON.
    pub fn write_report(report: &CleaningReport, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json).map_err(|e| CleaningError::write(path, e))?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKind, FillValue, OutlierBounds};
    use pretty_assertions::assert_eq;

    fn sample_report() -> CleaningReport {
        let columns = vec![
            ColumnSchema {
                name: "price".to_string(),
                kind: ColumnKind::Numeric,
            },
            ColumnSchema {
                name: "location".to_string(),
                kind: ColumnKind::Categorical,
            },
        ];
        ReportGenerator::build_report(ReportParams {
            input_file: Path::new("raw.csv"),
            output_file: Path::new("clean.csv"),
            target_column: "price",
            shape_before: (6, 2),
            columns: &columns,
            imputations: vec![ImputationRecord {
                column: "location".to_string(),
                kind: ColumnKind::Categorical,
                missing_count: 2,
                fill_value: FillValue::Categorical("Urban".to_string()),
            }],
            outliers: OutlierSummary {
                column: "price".to_string(),
                bounds: Some(OutlierBounds::from_quartiles(99.0, 101.0, 1.5)),
                rows_before: 6,
                rows_removed: 1,
                shape_after: (5, 2),
            },
            elapsed: Duration::from_millis(42),
        })
    }

    #[test]
    fn test_build_report() {
        let report = sample_report();
        assert_eq!(report.shape_after, (5, 2));
        assert_eq!(report.duration_ms, 42);
        assert_eq!(report.input_file, "raw.csv");
        assert!(!report.generated_at.is_empty());
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/run.json");

        ReportGenerator::write_report(&sample_report(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["target_column"], "price");
        assert_eq!(value["imputations"][0]["fill_value"], "Urban");
        assert_eq!(value["imputations"][0]["kind"], "categorical");
        assert_eq!(value["outliers"]["rows_removed"], 1);
        assert_eq!(value["outliers"]["bounds"]["upper"], 104.0);
    }
}
