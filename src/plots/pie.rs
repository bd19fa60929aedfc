//! Pie chart.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

use super::{frame, no_data, Plot};
use crate::charts::PieChart;
use crate::color::palette;
use crate::error::{Error, Result};
use crate::output::SvgEncoder;

/// Builder for pie charts. Slices start at twelve o'clock, clockwise.
#[derive(Debug, Clone)]
pub struct PiePlot {
    chart: PieChart,
    title: String,
    width: u32,
    height: u32,
}

impl PiePlot {
    /// Create a pie plot over a chart payload.
    #[must_use]
    pub fn new(chart: PieChart) -> Self {
        Self {
            chart,
            title: String::new(),
            width: 420,
            height: 300,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] when every slice is zero.
    pub fn build(self) -> Result<Self> {
        if !self.chart.has_data() {
            return Err(Error::EmptyData);
        }
        Ok(self)
    }
}

fn arc_path(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> String {
    let (x0, y0) = (cx + r * start.cos(), cy + r * start.sin());
    let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
    let large = u8::from(end - start > std::f64::consts::PI);
    let mut d = String::new();
    let _ = write!(
        d,
        "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large} 1 {x1:.2} {y1:.2} Z"
    );
    d
}

impl Plot for PiePlot {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn to_svg(&self) -> SvgEncoder {
        let total = self.chart.total();
        if total == 0 {
            return no_data(self.width, self.height, &self.title);
        }

        let h = f64::from(self.height);
        let r = ((h - 70.0) / 2.0).max(10.0);
        let cx = 24.0 + r;
        let cy = 44.0 + r;
        let mut svg = frame(self.width, self.height, &self.title);

        let mut angle = -FRAC_PI_2;
        for (count, color) in self.chart.data.iter().zip(&self.chart.colors) {
            if *count == 0 {
                continue;
            }
            let sweep = *count as f64 / total as f64 * TAU;
            svg = if *count == total {
                svg.circle(cx, cy, r, *color)
            } else {
                let d = arc_path(cx, cy, r, angle, angle + sweep);
                svg.path(&d, Some(*color), Some(palette::CARD), 1.5)
            };
            angle += sweep;
        }

        let legend_x = cx + r + 28.0;
        for (i, label) in self.chart.labels.iter().enumerate() {
            let count = self.chart.data.get(i).copied().unwrap_or(0);
            let color = self.chart.colors.get(i).copied().unwrap_or(palette::MUTED);
            let y = 60.0 + i as f64 * 22.0;
            let pct = count as f64 / total as f64 * 100.0;
            let entry = format!("{label}: {count} ({pct:.0}%)");
            svg = svg
                .rect(legend_x, y - 10.0, 12.0, 12.0, color)
                .text(legend_x + 18.0, y, &entry, 12.0, palette::TEXT);
        }
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pie(data: Vec<u64>) -> PieChart {
        PieChart {
            labels: vec!["High SQI".into(), "Medium SQI".into(), "Low SQI".into()],
            data,
            colors: vec![palette::SQI_HIGH, palette::SQI_MEDIUM, palette::SQI_LOW],
        }
    }

    #[test]
    fn test_pie_slices() {
        let svg = PiePlot::new(pie(vec![2, 1, 1])).build().unwrap().render_svg();
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("High SQI: 2 (50%)"));
    }

    #[test]
    fn test_single_slice_is_full_circle() {
        let svg = PiePlot::new(pie(vec![0, 3, 0])).render_svg();
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains(&format!("fill=\"{}\"", palette::SQI_MEDIUM.to_css())));
    }

    #[test]
    fn test_empty_pie() {
        assert!(PiePlot::new(pie(vec![0, 0, 0])).build().is_err());
        assert!(PiePlot::new(pie(vec![0, 0, 0])).render_svg().contains("No data"));
    }

    #[test]
    fn test_arc_large_flag() {
        assert!(arc_path(0.0, 0.0, 1.0, 0.0, 4.0).contains(" 0 1 1 "));
        assert!(arc_path(0.0, 0.0, 1.0, 0.0, 1.0).contains(" 0 0 1 "));
    }
}
