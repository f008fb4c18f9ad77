//! Core data types shared by the pipeline stages.

use crate::error::{CleaningError, Result, SchemaError};
use crate::utils::{is_float_dtype, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a column, fixed once when the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing value parses as a number.
    Numeric,
    /// Anything else, stored as strings.
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and kind of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// An in-memory dataset together with the column kinds inferred at load time.
///
/// Stages consume a `Dataset` and return a new one; the schema travels with
/// the frame unchanged, so a column can never switch kind between stages.
/// Numeric columns hold a polars numeric dtype, categorical columns hold
/// `DataType::String`.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    schema: Vec<ColumnSchema>,
}

impl Dataset {
    /// Tag every column of `frame` with its kind.
    ///
    /// Numeric dtypes become [`ColumnKind::Numeric`] (with `NaN` normalised to
    /// missing); every other dtype is cast to string and tagged
    /// [`ColumnKind::Categorical`]. A non-empty column with no values at all
    /// has no inferable kind and is rejected.
    pub fn from_frame(mut frame: DataFrame) -> Result<Self> {
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut schema = Vec::with_capacity(names.len());

        for name in names {
            let column = frame.column(&name)?;
            let dtype = column.dtype().clone();

            let kind = if is_numeric_dtype(&dtype) {
                if is_float_dtype(&dtype) {
                    let floats = column.as_materialized_series().cast(&DataType::Float64)?;
                    let normalised = floats
                        .f64()?
                        .apply(|v| v.filter(|x| !x.is_nan()))
                        .with_name(name.as_str().into())
                        .into_series();
                    frame.replace(&name, normalised)?;
                }
                ColumnKind::Numeric
            } else {
                if dtype != DataType::String {
                    let converted = column.cast(&DataType::String)?.take_materialized_series();
                    frame.replace(&name, converted)?;
                }
                ColumnKind::Categorical
            };

            let column = frame.column(&name)?;
            if column.len() > 0 && column.null_count() == column.len() {
                return Err(SchemaError::AmbiguousKind(name).into());
            }

            schema.push(ColumnSchema { name, kind });
        }

        Ok(Self { frame, schema })
    }

    /// Same schema, new frame. Used by stages to publish their output.
    pub(crate) fn with_frame(&self, frame: DataFrame) -> Self {
        Self {
            frame,
            schema: self.schema.clone(),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Columns in their original order.
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.schema
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    /// Look up the kind a column was loaded with.
    pub fn kind_of(&self, name: &str) -> Result<ColumnKind> {
        self.schema
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.kind)
            .ok_or_else(|| SchemaError::ColumnNotFound(name.to_string()).into())
    }

    /// Number of missing entries in a column.
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        self.kind_of(name)?;
        Ok(self.frame.column(name)?.null_count())
    }

    /// Number of missing entries across the whole dataset.
    pub fn total_missing(&self) -> usize {
        self.frame
            .get_columns()
            .iter()
            .map(|col| col.null_count())
            .sum()
    }

    /// Values of a numeric column, `None` for missing entries.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.expect_kind(name, ColumnKind::Numeric)?;
        let series = self.frame.column(name)?.as_materialized_series();
        let floats = series.cast(&DataType::Float64)?;
        Ok(floats.f64()?.into_iter().collect())
    }

    /// Values of a categorical column, `None` for missing entries.
    pub fn categorical_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        self.expect_kind(name, ColumnKind::Categorical)?;
        let series = self.frame.column(name)?.as_materialized_series();
        Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    fn expect_kind(&self, name: &str, expected: ColumnKind) -> Result<()> {
        let actual = self.kind_of(name)?;
        if actual != expected {
            return Err(CleaningError::Schema(SchemaError::KindMismatch {
                column: name.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            }));
        }
        Ok(())
    }
}

/// Value substituted for missing entries in a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Numeric(f64),
    Categorical(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Categorical(s) => write!(f, "'{s}'"),
        }
    }
}

/// Diagnostic record for one imputed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub fill_value: FillValue,
}

/// Inclusive `[lower, upper]` range derived from the quartiles of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Bounds `[q1 - k*iqr, q3 + k*iqr]`.
    pub fn from_quartiles(q1: f64, q3: f64, k: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            iqr,
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Diagnostic record for the outlier stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub column: String,
    /// `None` when the dataset had no rows to derive quartiles from.
    pub bounds: Option<OutlierBounds>,
    pub rows_before: usize,
    pub rows_removed: usize,
    pub shape_after: (usize, usize),
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    pub output_file: String,
    pub target_column: String,
    pub shape_before: (usize, usize),
    pub shape_after: (usize, usize),
    pub columns: Vec<ColumnSchema>,
    pub imputations: Vec<ImputationRecord>,
    pub outliers: OutlierSummary,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_frame_infers_kinds() {
        let df = df![
            "price" => [Some(100i64), None, Some(300)],
            "area" => [1.5, 2.5, 3.5],
            "city" => [Some("Pune"), Some("Delhi"), None],
            "has_garage" => [true, false, true],
        ]
        .unwrap();

        let dataset = Dataset::from_frame(df).unwrap();
        let kinds: Vec<_> = dataset.columns().iter().map(|c| c.kind).collect();

        assert_eq!(
            kinds,
            vec![
                ColumnKind::Numeric,
                ColumnKind::Numeric,
                ColumnKind::Categorical,
                ColumnKind::Categorical,
            ]
        );
        assert_eq!(
            dataset.frame().column("has_garage").unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn test_from_frame_preserves_column_order() {
        let df = df![
            "zeta" => [1.0],
            "alpha" => ["a"],
            "mid" => [2i64],
        ]
        .unwrap();

        let dataset = Dataset::from_frame(df).unwrap();
        let names: Vec<_> = dataset.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_from_frame_normalises_nan() {
        let df = df![
            "price" => [Some(1.0), Some(f64::NAN), None, Some(4.0)],
        ]
        .unwrap();

        let dataset = Dataset::from_frame(df).unwrap();
        assert_eq!(dataset.missing_count("price").unwrap(), 2);
    }

    #[test]
    fn test_from_frame_rejects_all_missing_column() {
        let df = df![
            "price" => [1.0, 2.0],
            "notes" => [Option::<&str>::None, None],
        ]
        .unwrap();

        let err = Dataset::from_frame(df).unwrap_err();
        assert!(matches!(
            err,
            CleaningError::Schema(SchemaError::AmbiguousKind(ref c)) if c == "notes"
        ));
    }

    #[test]
    fn test_typed_access_checks_kind() {
        let df = df![
            "price" => [1.0, 2.0],
            "city" => ["a", "b"],
        ]
        .unwrap();
        let dataset = Dataset::from_frame(df).unwrap();

        assert!(dataset.numeric_values("price").is_ok());
        assert!(dataset.categorical_values("city").is_ok());

        let err = dataset.numeric_values("city").unwrap_err();
        assert!(matches!(
            err,
            CleaningError::Schema(SchemaError::KindMismatch { .. })
        ));
        let err = dataset.kind_of("rooms").unwrap_err();
        assert!(matches!(
            err,
            CleaningError::Schema(SchemaError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_numeric_values_reads_integers_as_floats() {
        let df = df!["rooms" => [Some(3i64), None, Some(5)]].unwrap();
        let dataset = Dataset::from_frame(df).unwrap();

        assert_eq!(
            dataset.numeric_values("rooms").unwrap(),
            vec![Some(3.0), None, Some(5.0)]
        );
    }

    #[test]
    fn test_outlier_bounds() {
        let bounds = OutlierBounds::from_quartiles(99.0, 101.5, 1.5);
        assert_eq!(bounds.iqr, 2.5);
        assert_eq!(bounds.lower, 95.25);
        assert_eq!(bounds.upper, 105.25);
        assert!(bounds.contains(95.25));
        assert!(bounds.contains(105.25));
        assert!(!bounds.contains(105.26));
        assert!(!bounds.contains(1_000_000.0));
    }

    #[test]
    fn test_fill_value_display_and_json() {
        assert_eq!(FillValue::Numeric(20.0).to_string(), "20");
        assert_eq!(FillValue::Categorical("A".into()).to_string(), "'A'");
        assert_eq!(
            serde_json::to_string(&FillValue::Categorical("A".into())).unwrap(),
            "\"A\""
        );
        assert_eq!(
            serde_json::to_string(&FillValue::Numeric(2.5)).unwrap(),
            "2.5"
        );
    }
}
