//! Outlier removal on the target column.
//!
//! Rows whose target lies outside `[Q1 - k*IQR, Q3 + k*IQR]` are dropped.
//! Only the target column is inspected; predictor columns are left as they
//! are even when they hold extreme values.

use crate::config::{CleaningConfig, DEFAULT_IQR_MULTIPLIER};
use crate::error::{Result, SchemaError};
use crate::types::{Dataset, OutlierBounds, OutlierSummary};
use crate::utils::{quantile_sorted, sorted_present};
use polars::prelude::*;
use tracing::{debug, info};

/// Removes rows with an anomalous target value using the IQR method.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    column: String,
    iqr_multiplier: f64,
}

impl OutlierFilter {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self {
            column: config.target_column.clone(),
            iqr_multiplier: config.iqr_multiplier,
        }
    }

    pub fn with_iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = k;
        self
    }

    /// Bounds derived from the current values of the target column.
    ///
    /// Returns `None` for an empty dataset.
    pub fn bounds(&self, dataset: &Dataset) -> Result<Option<OutlierBounds>> {
        let values = self.target_values(dataset)?;
        Ok(self.bounds_for(&values))
    }

    /// Drop every row whose target is strictly outside the bounds.
    pub fn filter(&self, input: Dataset) -> Result<(Dataset, OutlierSummary)> {
        let values = self.target_values(&input)?;
        let rows_before = input.height();

        let Some(bounds) = self.bounds_for(&values) else {
            debug!("No rows to filter in {}", self.column);
            let summary = OutlierSummary {
                column: self.column.clone(),
                bounds: None,
                rows_before,
                rows_removed: 0,
                shape_after: input.shape(),
            };
            return Ok((input, summary));
        };

        debug!(
            "{} bounds: Q1={} Q3={} IQR={} -> [{}, {}]",
            self.column, bounds.q1, bounds.q3, bounds.iqr, bounds.lower, bounds.upper
        );

        let mask_values: Vec<bool> = values
            .iter()
            .map(|v| v.is_some_and(|val| bounds.contains(val)))
            .collect();
        let rows_removed = mask_values.iter().filter(|keep| !**keep).count();

        let output = if rows_removed > 0 {
            info!("Found {} outliers in {} column", rows_removed, self.column);
            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            input.with_frame(input.frame().filter(&mask)?)
        } else {
            input
        };

        info!(
            "Removed {} outliers. New dataset shape: {:?}",
            rows_removed,
            output.shape()
        );

        let summary = OutlierSummary {
            column: self.column.clone(),
            bounds: Some(bounds),
            rows_before,
            rows_removed,
            shape_after: output.shape(),
        };
        Ok((output, summary))
    }

    fn target_values(&self, dataset: &Dataset) -> Result<Vec<Option<f64>>> {
        let values = dataset.numeric_values(&self.column)?;
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            return Err(SchemaError::MissingTargetValues {
                column: self.column.clone(),
                count: missing,
            }
            .into());
        }
        Ok(values)
    }

    fn bounds_for(&self, values: &[Option<f64>]) -> Option<OutlierBounds> {
        let sorted = sorted_present(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        Some(OutlierBounds::from_quartiles(q1, q3, self.iqr_multiplier))
    }
}
