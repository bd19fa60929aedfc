//! Summary statistics for a single numeric column.

use serde::{Deserialize, Serialize};

use super::{finite, sorted};

/// Aggregate statistics for one column of run or sample values.
///
/// All fields are zero when the input held no finite numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (average of the two middle values for even counts).
    pub median: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Population standard deviation (divides by `count`).
    pub std: f64,
    /// Number of finite values that contributed.
    pub count: usize,
}

impl DescriptiveStats {
    /// Whether any value contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `max - min`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Compute [`DescriptiveStats`] over the finite values of `values`.
///
/// Missing and non-finite entries are skipped. An empty input yields the
/// all-zero bundle rather than an error.
///
/// ```
/// use radarix::stats::describe;
///
/// let stats = describe([1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(stats.mean, 2.5);
/// assert_eq!(stats.median, 2.5);
/// assert_eq!(stats.count, 4);
/// ```
pub fn describe<I>(values: I) -> DescriptiveStats
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    let clean = sorted(finite(values));
    let n = clean.len();
    if n == 0 {
        return DescriptiveStats::default();
    }

    let count = n as f64;
    let mean = clean.iter().sum::<f64>() / count;
    let mid = n / 2;
    let median = if n % 2 == 1 {
        clean[mid]
    } else {
        (clean[mid - 1] + clean[mid]) / 2.0
    };
    let variance = clean.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    DescriptiveStats {
        mean,
        median,
        min: clean[0],
        max: clean[n - 1],
        std: variance.sqrt(),
        count: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_describe_mean() {
        assert_relative_eq!(describe([1.0, 2.0, 3.0, 4.0]).mean, 2.5);
    }

    #[test]
    fn test_describe_population_std() {
        let stats = describe([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(stats.std, 2.0);
        assert_relative_eq!(stats.mean, 5.0);
    }

    #[test]
    fn test_describe_empty_is_all_zero() {
        let stats = describe(Vec::<f64>::new());
        assert_eq!(
            stats,
            DescriptiveStats {
                mean: 0.0,
                median: 0.0,
                min: 0.0,
                max: 0.0,
                std: 0.0,
                count: 0,
            }
        );
        assert!(stats.is_empty());
    }

    #[test]
    fn test_describe_only_missing_is_empty() {
        let stats = describe([None, Some(f64::NAN)]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_describe_odd_median() {
        let stats = describe([9.0, 1.0, 5.0]);
        assert_relative_eq!(stats.median, 5.0);
        assert_relative_eq!(stats.min, 1.0);
        assert_relative_eq!(stats.max, 9.0);
        assert_relative_eq!(stats.range(), 8.0);
    }

    #[test]
    fn test_describe_even_median() {
        assert_relative_eq!(describe([4.0, 1.0, 3.0, 2.0]).median, 2.5);
    }

    #[test]
    fn test_describe_skips_missing() {
        let stats = describe([Some(60.0), None, Some(80.0), Some(f64::NAN)]);
        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.mean, 70.0);
        assert_relative_eq!(stats.std, 10.0);
    }

    #[test]
    fn test_describe_single_value() {
        let stats = describe([72.5]);
        assert_eq!(stats.count, 1);
        assert_relative_eq!(stats.median, 72.5);
        assert_relative_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_describe_serializes_field_names() {
        let json = serde_json::to_value(describe([1.0, 3.0])).unwrap();
        for key in ["mean", "median", "min", "max", "std", "count"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_count_matches_finite_elements(
            values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 0..64)
        ) {
            let expected = values.iter().filter(|v| v.is_some()).count();
            prop_assert_eq!(describe(values).count, expected);
        }

        #[test]
        fn prop_median_is_order_independent(
            mut values in prop::collection::vec(-1e3f64..1e3, 1..64)
        ) {
            let before = describe(values.iter().copied()).median;
            values.reverse();
            let mid = values.len() / 2;
            values.rotate_left(mid);
            let after = describe(values.iter().copied()).median;
            prop_assert_eq!(before, after);
        }

        #[test]
        fn prop_mean_within_bounds(values in prop::collection::vec(-1e3f64..1e3, 1..64)) {
            let stats = describe(values);
            prop_assert!(stats.min <= stats.mean + 1e-9);
            prop_assert!(stats.mean <= stats.max + 1e-9);
            prop_assert!(stats.std >= 0.0);
        }
    }
}
