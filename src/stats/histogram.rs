//! Equal-width histogram bucketing.
//!
//! Mirrors the bucketing the EDA backend applies server-side, so locally
//! computed run-level histograms line up with the sample-level ones it
//! returns.

use serde::{Deserialize, Serialize};

use super::finite;

/// Bin count for histograms computed locally from run-level records.
pub const DEFAULT_RUN_BINS: usize = 20;

/// Bin count requested from the backend for sample-level histograms.
pub const DEFAULT_SAMPLE_BINS: usize = 30;

/// Bin edges and per-bin counts.
///
/// For non-empty data `bins.len() == counts.len() + 1`. The last bin is
/// closed on the right.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramBins {
    /// Ascending bin edges.
    #[serde(default)]
    pub bins: Vec<f64>,
    /// Number of values per bin.
    #[serde(default)]
    pub counts: Vec<u64>,
}

impl HistogramBins {
    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Whether there is at least one full bin to draw.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.bins.len() >= 2 && !self.counts.is_empty()
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether there are no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Bin midpoints formatted with `precision` decimals, one per bin.
    #[must_use]
    pub fn midpoint_labels(&self, precision: usize) -> Vec<String> {
        self.bins
            .windows(2)
            .map(|w| format!("{:.precision$}", (w[0] + w[1]) / 2.0))
            .collect()
    }

    /// Largest single-bin count.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bucket the finite values of `values` into `k` equal-width bins.
///
/// `k == 0` is treated as one bin. A zero-width range (all values equal)
/// uses a bin width of one so the edges stay distinct. Values equal to the
/// maximum land in the last bin.
///
/// ```
/// use radarix::stats::histogram;
///
/// let hist = histogram([5.0], 10);
/// assert_eq!(hist.bins.len(), 11);
/// assert_eq!(hist.counts[0], 1);
/// assert_eq!(hist.total(), 1);
/// ```
pub fn histogram<I>(values: I, k: usize) -> HistogramBins
where
    I: IntoIterator,
    I::Item: Into<Option<f64>>,
{
    let clean = finite(values);
    if clean.is_empty() {
        return HistogramBins::default();
    }

    let k = k.max(1);
    let min = clean.iter().copied().fold(f64::INFINITY, f64::min);
    let max = clean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Halved so `max - min` cannot overflow for finite input.
    let half_range = max * 0.5 - min * 0.5;
    let half_span = if half_range > 0.0 { half_range } else { 0.5 };
    let half_width = half_span / k as f64;

    let bins = (0..=k)
        .map(|i| (min * 0.5 + i as f64 * half_width) * 2.0)
        .collect();
    let mut counts = vec![0u64; k];
    for v in clean {
        let idx = ((v * 0.5 - min * 0.5) / half_span * k as f64).floor();
        let idx = (idx.max(0.0) as usize).min(k - 1);
        counts[idx] += 1;
    }

    HistogramBins { bins, counts }
}
