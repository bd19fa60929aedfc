//! Horizontal box-and-whisker plot.

use super::{frame, no_data, Plot};
use crate::color::palette;
use crate::output::SvgEncoder;
use crate::scale::{LinearScale, Scale};
use crate::stats::BoxStats;

const PADDING: f64 = 12.0;
const CAPTION_LINE: f64 = 18.0;

/// Builder for a single horizontal box plot with a five-number caption.
///
/// An absent bundle renders a "No data" card instead of a box of zeros.
#[derive(Debug, Clone)]
pub struct BoxPlot {
    stats: Option<BoxStats>,
    title: String,
    width: u32,
    show_outliers: bool,
}

impl BoxPlot {
    /// Create a box plot for one bundle.
    #[must_use]
    pub fn new(stats: Option<BoxStats>) -> Self {
        Self {
            stats,
            title: String::new(),
            width: 360,
            show_outliers: true,
        }
    }

    /// Create a box plot directly from raw values.
    #[must_use]
    pub fn from_data<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        Self::new(BoxStats::from_data(values))
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the output width; the height follows from the layout.
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width.max(120);
        self
    }

    /// Draw outliers as dots beyond the whiskers.
    #[must_use]
    pub fn show_outliers(mut self, show: bool) -> Self {
        self.show_outliers = show;
        self
    }

    /// The bundle being drawn.
    #[must_use]
    pub fn stats(&self) -> Option<&BoxStats> {
        self.stats.as_ref()
    }

    /// `min`, `q1`, `median`, `q3`, `max` lines, three decimals each.
    #[must_use]
    pub fn caption(&self) -> Vec<String> {
        self.stats.as_ref().map_or_else(Vec::new, |s| {
            [
                ("min", s.min),
                ("q1", s.q1),
                ("median", s.median),
                ("q3", s.q3),
                ("max", s.max),
            ]
            .iter()
            .map(|(name, v)| format!("{name}: {v:.3}"))
            .collect()
        })
    }

    fn height(&self) -> u32 {
        if self.stats.is_some() {
            280
        } else {
            120
        }
    }
}

impl Plot for BoxPlot {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height())
    }

    fn to_svg(&self) -> SvgEncoder {
        let Some(s) = &self.stats else {
            return no_data(self.width, self.height(), &self.title);
        };

        let left = PADDING + 8.0;
        let right = f64::from(self.width) - PADDING - 8.0;
        let x = LinearScale::new((s.min, s.max), (left, right));
        let mid = 110.0;

        let lw = x.scale(s.lower_whisker);
        let uw = x.scale(s.upper_whisker);
        let q1 = x.scale(s.q1);
        let q3 = x.scale(s.q3);
        let median = x.scale(s.median);

        let mut svg = frame(self.width, self.height(), &self.title)
            .line(lw, mid, uw, mid, palette::WHISKER, 2.0)
            .line(lw, mid - 8.0, lw, mid + 8.0, palette::WHISKER, 2.0)
            .line(uw, mid - 8.0, uw, mid + 8.0, palette::WHISKER, 2.0)
            .rect_outlined(
                q1,
                mid - 14.0,
                (q3 - q1).max(2.0),
                28.0,
                4.0,
                palette::BOX_FILL,
                palette::BOX_STROKE,
                2.0,
            )
            .line(median, mid - 16.0, median, mid + 16.0, palette::MEDIAN, 2.5);

        if self.show_outliers {
            for o in &s.outliers {
                svg = svg.circle(x.scale(*o), mid + 26.0, 3.0, palette::OUTLIER);
            }
        }

        for (i, line) in self.caption().iter().enumerate() {
            svg = svg.text(left, 196.0 + i as f64 * CAPTION_LINE, line, 14.0, palette::TEXT);
        }
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxplot_caption_three_decimals() {
        let plot = BoxPlot::from_data([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            plot.caption(),
            vec!["min: 1.000", "q1: 2.000", "median: 3.000", "q3: 4.000", "max: 5.000"]
        );
    }

    #[test]
    fn test_boxplot_outlier_dots() {
        let svg = BoxPlot::from_data([1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
            .title("Range_SD")
            .render_svg();
        assert_eq!(svg.matches(&palette::OUTLIER.to_css()).count(), 1);
        assert!(svg.contains("max: 100.000"));

        let hidden = BoxPlot::from_data([1.0, 2.0, 3.0, 4.0, 5.0, 100.0])
            .show_outliers(false)
            .render_svg();
        assert_eq!(hidden.matches("<circle").count(), 0);
    }

    #[test]
    fn test_boxplot_absent_renders_placeholder() {
        let plot = BoxPlot::new(None).title("Heart_clean");
        assert!(plot.caption().is_empty());
        let svg = plot.render_svg();
        assert!(svg.contains("No data"));
        assert!(svg.contains("Heart_clean"));
        assert_eq!(plot.dimensions(), (360, 120));
    }

    #[test]
    fn test_boxplot_constant_data() {
        let svg = BoxPlot::from_data([2.0, 2.0, 2.0]).render_svg();
        assert!(svg.contains("median: 2.000"));
        assert!(!svg.contains("NaN"));
    }
}
