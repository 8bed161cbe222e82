// plausible-core/src/domain/quality/statistics.rs

use serde::{Deserialize, Serialize};

use crate::domain::record::Record;

/// Descriptive statistics of one field across the dataset.
///
/// All `Option` members are `None` together when no record carries a
/// numeric value for the field ("no data"), which callers must read as
/// "cannot outlier-check" rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    pub field_name: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

impl FieldStatistics {
    pub fn no_data(field_name: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            count: 0,
            min: None,
            max: None,
            mean: None,
            median: None,
            std_dev: None,
        }
    }

    /// Population statistics over the numeric values of `field_name`.
    /// Missing, null, blank and non-numeric values are ignored.
    pub fn compute(records: &[Record], field_name: &str) -> Self {
        let values: Vec<f64> = records
            .iter()
            .filter_map(|r| r.number(field_name))
            .collect();
        Self::from_values(field_name, &values)
    }

    pub fn from_values(field_name: &str, values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::no_data(field_name);
        }

        let n = values.len() as f64;
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = values.iter().sum::<f64>() / n;
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        // Population variance (divide by n, not n - 1)
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self {
            field_name: field_name.to_string(),
            count: values.len(),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            mean: Some(mean),
            median: Some(median),
            std_dev: Some(variance.sqrt()),
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }

    /// Copy rounded to 2 decimals, for display. Never feed this into a
    /// z-score.
    pub fn rounded(&self) -> Self {
        Self {
            field_name: self.field_name.clone(),
            count: self.count,
            min: self.min.map(round2),
            max: self.max.map(round2),
            mean: self.mean.map(round2),
            median: self.median.map(round2),
            std_dev: self.std_dev.map(round2),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
