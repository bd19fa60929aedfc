//! Interpolated quantiles over sorted data.

/// Linearly interpolated quantile of an ascending-sorted slice.
///
/// The rank is `q * (n - 1)`; the result interpolates between the two
/// bracketing order statistics. `q` is clamped into `[0, 1]`. Returns
/// `None` for an empty slice.
///
/// ```
/// use radarix::stats::quantile;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&sorted, 0.5), Some(2.5));
/// assert_eq!(quantile(&sorted, 0.25), Some(1.75));
/// assert_eq!(quantile(&[], 0.5), None);
/// ```
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = last as f64 * q.clamp(0.0, 1.0);
    let base = pos.floor() as usize;
    let rest = pos - base as f64;

    match sorted.get(base + 1) {
        Some(&next) => Some(sorted[base] + rest * (next - sorted[base])),
        None => Some(sorted[base]),
    }
}
