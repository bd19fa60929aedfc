//! Box plot statistics (Tukey whiskers).

use serde::{Deserialize, Serialize};

use super::{finite, quantile, sorted};

/// Whisker reach in interquartile ranges beyond Q1/Q3.
pub const WHISKER_FACTOR: f64 = 1.5;

/// Statistics computed for a box plot.
///
/// Field names match the EDA backend's `/eda/boxplot` payload, so the same
/// type carries both server-side and locally computed bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Smallest value, outliers included.
    pub min: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Median (50th percentile).
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Largest value, outliers included.
    pub max: f64,
    /// Interquartile range (Q3 - Q1).
    #[serde(default)]
    pub iqr: f64,
    /// Smallest data point within the lower fence.
    pub lower_whisker: f64,
    /// Largest data point within the upper fence.
    pub upper_whisker: f64,
    /// Values beyond either fence, ascending.
    #[serde(default)]
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute box plot statistics from data.
    ///
    /// Uses the 1.5 × IQR rule. Returns `None` when no finite value is
    /// present: an absent box, not a box of zeros.
    pub fn from_data<I>(values: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        let sorted = sorted(finite(values));
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;

        let lower_fence = q1 - WHISKER_FACTOR * iqr;
        let upper_fence = q3 + WHISKER_FACTOR * iqr;

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&x| x >= lower_fence)
            .unwrap_or(min);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= upper_fence)
            .unwrap_or(max);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_fence || x > upper_fence)
            .collect();

        Some(Self {
            min,
            q1,
            median,
            q3,
            max,
            iqr,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    /// Theoretical lower bound: `q1 - 1.5 * iqr`.
    #[must_use]
    pub fn lower_fence(&self) -> f64 {
        self.q1 - WHISKER_FACTOR * (self.q3 - self.q1)
    }

    /// Theoretical upper bound: `q3 + 1.5 * iqr`.
    #[must_use]
    pub fn upper_fence(&self) -> f64 {
        self.q3 + WHISKER_FACTOR * (self.q3 - self.q1)
    }

    /// Whether `value` lies outside the fences.
    #[must_use]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_fence() || value > self.upper_fence()
    }
}
