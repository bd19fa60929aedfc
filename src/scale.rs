//! Scale functions for data-to-pixel mappings.
//!
//! Every plot maps its data through a [`LinearScale`] (continuous axes) or a
//! [`BandScale`] (category axes).

/// Maps data values (`D`) to pixel positions (`R`).
pub trait Scale<D, R> {
    /// Pixel position of `value`.
    fn scale(&self, value: D) -> R;

    /// Data extent, low end first.
    fn domain(&self) -> (D, D);

    /// Pixel extent as configured.
    fn range(&self) -> (R, R);
}

/// Continuous axis such as bpm or metres.
///
/// A degenerate domain (min == max) is widened to a width of 1 centred on
/// the value, so a series of identical readings still plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Scale over `domain`; a reversed domain is swapped and a non-finite one
    /// becomes `0..1`.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut lo, mut hi) = if domain.0 <= domain.1 {
            domain
        } else {
            (domain.1, domain.0)
        };
        if !lo.is_finite() || !hi.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }
        Self {
            domain_min: lo,
            domain_max: hi,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Create a scale from the finite extent of some data.
    ///
    /// Returns `None` when the data holds no finite value.
    #[must_use]
    pub fn from_data<I>(data: I, range: (f64, f64)) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = data
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new((min, max), range))
    }

    /// Extend the domain to include zero.
    #[must_use]
    pub fn include_zero(self) -> Self {
        Self::new(
            (self.domain_min.min(0.0), self.domain_max.max(0.0)),
            (self.range_min, self.range_max),
        )
    }

    /// Pad the domain by a fraction of its width on both sides.
    #[must_use]
    pub fn padded(self, fraction: f64) -> Self {
        let pad = (self.domain_max - self.domain_min) * fraction;
        Self::new(
            (self.domain_min - pad, self.domain_max + pad),
            (self.range_min, self.range_max),
        )
    }

    /// Roughly `count` evenly spaced tick values covering the domain.
    ///
    /// Step sizes are 1, 2 or 5 times a power of ten.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let count = count.max(1) as f64;
        let span = self.domain_max - self.domain_min;
        let raw = span / count;
        let magnitude = 10f64.powf(raw.log10().floor());
        let step = [1.0, 2.0, 5.0, 10.0]
            .into_iter()
            .map(|m| m * magnitude)
            .find(|s| *s >= raw)
            .unwrap_or(10.0 * magnitude);

        let first = (self.domain_min / step).ceil() as i64;
        let last = (self.domain_max / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let fraction = (value - self.domain_min) / (self.domain_max - self.domain_min);
        fraction.mul_add(self.range_max - self.range_min, self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Band scale for evenly spaced categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range_min: f64,
    range_max: f64,
    padding: f64,
}

impl BandScale {
    /// Create a band scale over `count` categories.
    #[must_use]
    pub fn new(count: usize, range: (f64, f64)) -> Self {
        Self {
            count: count.max(1),
            range_min: range.0,
            range_max: range.1,
            padding: 0.2,
        }
    }

    /// Set inner padding as a fraction of the step (0.0-0.9).
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding.clamp(0.0, 0.9);
        self
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.range_max - self.range_min) / self.count as f64
    }

    /// Width of one band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Centre of band `index`.
    #[must_use]
    pub fn center(&self, index: usize) -> f64 {
        self.scale(index) + self.bandwidth() / 2.0
    }
}

impl Scale<usize, f64> for BandScale {
    fn scale(&self, index: usize) -> f64 {
        self.range_min + self.step() * index as f64 + self.step() * self.padding / 2.0
    }

    fn domain(&self) -> (usize, usize) {
        (0, self.count - 1)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bpm_axis_to_pixels() {
        let scale = LinearScale::new((40.0, 140.0), (0.0, 500.0));
        assert_relative_eq!(scale.scale(40.0), 0.0);
        assert_relative_eq!(scale.scale(90.0), 250.0);
        assert_relative_eq!(scale.scale(140.0), 500.0);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (200.0, 0.0));
        assert_relative_eq!(scale.scale(0.0), 200.0);
        assert_relative_eq!(scale.scale(10.0), 0.0);
    }

    #[test]
    fn test_degenerate_domain_widens() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert_eq!(scale.domain(), (4.5, 5.5));
        assert_relative_eq!(scale.scale(5.0), 50.0);
    }

    #[test]
    fn test_reversed_domain_normalized() {
        let scale = LinearScale::new((10.0, 0.0), (0.0, 1.0));
        assert_eq!(scale.domain(), (0.0, 10.0));
    }

    #[test]
    fn test_from_data_skips_non_finite() {
        let scale = LinearScale::from_data([f64::NAN, 2.0, 8.0], (0.0, 1.0)).unwrap();
        assert_eq!(scale.domain(), (2.0, 8.0));
        assert!(LinearScale::from_data(Vec::new(), (0.0, 1.0)).is_none());
        assert!(LinearScale::from_data([f64::NAN], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_include_zero_and_padding() {
        let scale = LinearScale::new((2.0, 10.0), (0.0, 1.0)).include_zero();
        assert_eq!(scale.domain(), (0.0, 10.0));
        let padded = scale.padded(0.1);
        assert_eq!(padded.domain(), (-1.0, 11.0));
    }

    #[test]
    fn test_ticks_are_round() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        let small = LinearScale::new((0.01, 0.05), (0.0, 1.0)).ticks(4);
        assert!(small.len() >= 2);
        assert!(small.iter().all(|t| *t >= 0.01 - 1e-12 && *t <= 0.05 + 1e-12));
    }

    #[test]
    fn test_band_scale() {
        let band = BandScale::new(4, (0.0, 400.0)).padding(0.0);
        assert_relative_eq!(band.step(), 100.0);
        assert_relative_eq!(band.bandwidth(), 100.0);
        assert_relative_eq!(band.scale(2), 200.0);
        assert_relative_eq!(band.center(0), 50.0);
        assert_eq!(band.domain(), (0, 3));
    }

    #[test]
    fn test_band_scale_zero_categories() {
        let band = BandScale::new(0, (0.0, 100.0));
        assert_eq!(band.domain(), (0, 0));
        assert!(band.bandwidth() > 0.0);
    }
}
