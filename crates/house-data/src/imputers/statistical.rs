//! Statistical imputation: median for numeric columns, mode for categorical ones.

use crate::error::{Result, SchemaError};
use crate::types::{ColumnKind, ColumnSchema, Dataset, FillValue, ImputationRecord};
use crate::utils::{median, mode};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Fills every missing value using a strategy chosen by column kind.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Impute all columns of `input`.
    ///
    /// Fill values are derived from the input version only, so the result does
    /// not depend on the order in which columns or rows are visited. Columns
    /// without missing values are passed through untouched.
    pub fn impute(input: Dataset) -> Result<(Dataset, Vec<ImputationRecord>)> {
        let mut frame = input.frame().clone();
        let mut records = Vec::new();

        for col in input.columns() {
            let missing_count = input.missing_count(&col.name)?;
            if missing_count == 0 {
                continue;
            }
            info!("Found {} missing values in {}", missing_count, col.name);
            if missing_count * 2 > input.height() {
                warn!(
                    "Column {} is mostly missing ({}/{} rows)",
                    col.name,
                    missing_count,
                    input.height()
                );
            }

            let record = match col.kind {
                ColumnKind::Numeric => {
                    Self::apply_numeric_median(&mut frame, &input, col, missing_count)?
                }
                ColumnKind::Categorical => {
                    Self::apply_mode_imputation(&mut frame, &input, col, missing_count)?
                }
            };
            records.push(record);
        }

        let output = input.with_frame(frame);
        debug!("Missing values remaining: {}", output.total_missing());
        Ok((output, records))
    }

    /// Replace missing entries with the median of the present ones.
    fn apply_numeric_median(
        frame: &mut DataFrame,
        input: &Dataset,
        col: &ColumnSchema,
        missing_count: usize,
    ) -> Result<ImputationRecord> {
        let values = input.numeric_values(&col.name)?;
        let median_val =
            median(&values).ok_or_else(|| SchemaError::AmbiguousKind(col.name.clone()))?;

        let filled: Vec<Option<f64>> = values
            .iter()
            .map(|v| Some(v.unwrap_or(median_val)))
            .collect();
        frame.replace(&col.name, Series::new(col.name.as_str().into(), filled))?;

        info!(
            "Filled missing values in {} with median: {}",
            col.name, median_val
        );

        Ok(ImputationRecord {
            column: col.name.clone(),
            kind: col.kind,
            missing_count,
            fill_value: FillValue::Numeric(median_val),
        })
    }

    /// Replace missing entries with the most frequent present value.
    fn apply_mode_imputation(
        frame: &mut DataFrame,
        input: &Dataset,
        col: &ColumnSchema,
        missing_count: usize,
    ) -> Result<ImputationRecord> {
        let values = input.categorical_values(&col.name)?;
        let mode_val =
            mode(&values).ok_or_else(|| SchemaError::AmbiguousKind(col.name.clone()))?;

        let filled: Vec<Option<String>> = values
            .into_iter()
            .map(|v| Some(v.unwrap_or_else(|| mode_val.clone())))
            .collect();
        frame.replace(&col.name, Series::new(col.name.as_str().into(), filled))?;

        info!("Filled missing values in {} with mode: {}", col.name, mode_val);

        Ok(ImputationRecord {
            column: col.name.clone(),
            kind: col.kind,
            missing_count,
            fill_value: FillValue::Categorical(mode_val),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset(df: DataFrame) -> Dataset {
        Dataset::from_frame(df).unwrap()
    }

    #[test]
    fn test_numeric_median_fill() {
        let input = dataset(
            df![
                "price" => [1.0, 2.0, 3.0, 4.0],
                "sqft" => [Some(10.0), Some(20.0), None, Some(30.0)],
            ]
            .unwrap(),
        );

        let (output, records) = StatisticalImputer::impute(input).unwrap();

        assert_eq!(
            output.numeric_values("sqft").unwrap(),
            vec![Some(10.0), Some(20.0), Some(20.0), Some(30.0)]
        );
        assert_eq!(
            records,
            vec![ImputationRecord {
                column: "sqft".to_string(),
                kind: ColumnKind::Numeric,
                missing_count: 1,
                fill_value: FillValue::Numeric(20.0),
            }]
        );
    }

    #[test]
    fn test_numeric_fill_value_independent_of_missing_count() {
        let input = dataset(
            df![
                "price" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                "rooms" => [Some(1i64), None, None, None, Some(4), Some(10)],
            ]
            .unwrap(),
        );

        let (output, records) = StatisticalImputer::impute(input).unwrap();

        // median of [1, 4, 10]
        assert_eq!(records[0].fill_value, FillValue::Numeric(4.0));
        assert_eq!(records[0].missing_count, 3);
        assert_eq!(
            output.numeric_values("rooms").unwrap(),
            vec![Some(1.0), Some(4.0), Some(4.0), Some(4.0), Some(4.0), Some(10.0)]
        );
        assert_eq!(output.kind_of("rooms").unwrap(), ColumnKind::Numeric);
    }

    #[test]
    fn test_categorical_mode_fill() {
        let input = dataset(
            df![
                "price" => [1.0, 2.0, 3.0, 4.0],
                "location" => [Some("A"), Some("A"), Some("B"), None],
            ]
            .unwrap(),
        );

        let (output, records) = StatisticalImputer::impute(input).unwrap();

        assert_eq!(
            output.categorical_values("location").unwrap(),
            vec![
                Some("A".to_string()),
                Some("A".to_string()),
                Some("B".to_string()),
                Some("A".to_string()),
            ]
        );
        assert_eq!(records[0].fill_value, FillValue::Categorical("A".to_string()));
    }

    #[test]
    fn test_categorical_tie_uses_first_occurrence() {
        let input = dataset(
            df![
                "price" => [1.0, 2.0, 3.0, 4.0, 5.0],
                "condition" => [None, Some("Good"), Some("Fair"), Some("Fair"), Some("Good")],
            ]
            .unwrap(),
        );

        let (output, _) = StatisticalImputer::impute(input).unwrap();
        assert_eq!(
            output.categorical_values("condition").unwrap()[0],
            Some("Good".to_string())
        );
    }

    #[test]
    fn test_complete_columns_pass_through() {
        let input = dataset(
            df![
                "price" => [100i64, 200, 300],
                "city" => ["x", "y", "z"],
            ]
            .unwrap(),
        );
        let before = input.frame().clone();

        let (output, records) = StatisticalImputer::impute(input).unwrap();

        assert!(records.is_empty());
        assert!(output.frame().equals(&before));
        assert_eq!(
            output.frame().column("price").unwrap().dtype(),
            &DataType::Int64
        );
    }

    #[test]
    fn test_no_missing_values_remain() {
        let input = dataset(
            df![
                "price" => [Some(1.0), None, Some(3.0), Some(9.0)],
                "year" => [Some(1990i64), Some(2000), None, None],
                "zone" => [None, Some("R1"), None, Some("C2")],
            ]
            .unwrap(),
        );

        let (output, records) = StatisticalImputer::impute(input).unwrap();

        assert_eq!(output.total_missing(), 0);
        assert_eq!(records.len(), 3);
        let names: Vec<_> = output.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["price", "year", "zone"]);
    }
}
