//! Descriptive statistics engine.
//!
//! Pure functions over numeric collections fetched from the EDA backend:
//!
//! - [`describe`]: mean, median, min, max, population standard deviation, count
//! - [`quantile`]: linear interpolation between order statistics
//! - [`histogram`]: fixed-count equal-width bucketing
//! - [`BoxStats`]: quartiles, Tukey whiskers and outliers
//!
//! Every entry point drops non-finite input (NaN, ±∞, missing) before doing
//! any arithmetic, so callers can pass raw optional columns straight through.

mod boxplot;
mod descriptive;
mod histogram;
mod quantile;

pub use boxplot::{BoxStats, WHISKER_FACTOR};
pub use descriptive::{describe, DescriptiveStats};
pub use histogram::{histogram, HistogramBins, DEFAULT_RUN_BINS, DEFAULT_SAMPLE_BINS};
pub use quantile::quantile;

/// Keep only the finite numbers of a collection of optional values.
///
/// Order is preserved.
pub fn finite<I>(values: I) -> Vec<f64>
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    values
        .into_iter()
        .filter_map(|v| -> Option<f64> { v.into() })
        .filter(|v| v.is_finite())
        .collect()
}

/// Sort finite values ascending.
pub(crate) fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}
