//! Run-level scatter plots such as HR vs RR or HR vs SQI.

use super::{frame, legend, no_data, x_axis, y_axis, Plot, PlotArea};
use crate::charts::ScatterChart;
use crate::color::palette;
use crate::error::{Error, Result};
use crate::output::{SvgEncoder, TextAnchor};
use crate::scale::{LinearScale, Scale};

/// One series of points, each optionally tagged with its run.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    chart: ScatterChart,
    title: String,
    point_size: f64,
    alpha: f32,
    width: u32,
    height: u32,
}

impl ScatterPlot {
    /// Create a scatter plot over a chart payload.
    #[must_use]
    pub fn new(chart: ScatterChart) -> Self {
        Self {
            chart,
            title: String::new(),
            point_size: 4.0,
            alpha: 0.9,
            width: 520,
            height: 340,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the point radius in pixels.
    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.point_size = size;
        self
    }

    /// Point opacity, clamped to `0..=1`.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Points that will be drawn.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.chart.plottable().count()
    }

    /// Validate the series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] for a series without plottable points.
    pub fn build(self) -> Result<Self> {
        if self.chart.is_empty() {
            return Err(Error::EmptyData);
        }
        Ok(self)
    }
}

impl Plot for ScatterPlot {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn to_svg(&self) -> SvgEncoder {
        let area = PlotArea::inset(self.width, self.height, false);
        let chart = &self.chart;
        let (Some(x), Some(y)) = (
            LinearScale::from_data(chart.plottable().map(|(_, x, _)| x), (area.left, area.right)),
            LinearScale::from_data(chart.plottable().map(|(_, _, y)| y), (area.bottom, area.top)),
        ) else {
            return no_data(self.width, self.height, &self.title);
        };
        let x = x.padded(0.05);
        let y = y.padded(0.08);

        let mut svg = frame(self.width, self.height, &self.title);
        svg = y_axis(svg, &y, &area, false, true);
        svg = x_axis(svg, &x, &area);

        let color = self.chart.color.with_opacity(self.alpha);
        for (p, px, py) in chart.plottable() {
            svg = svg.circle(x.scale(px), y.scale(py), self.point_size, color);
            if let Some(run) = p.run {
                svg = svg.tooltip(&format!("Run {run}: ({px:.2}, {py:.2})"));
            }
        }

        if !self.chart.x_label.is_empty() {
            svg = svg.text_anchored(
                (area.left + area.right) / 2.0,
                f64::from(self.height) - 8.0,
                &self.chart.x_label,
                11.0,
                palette::MUTED,
                TextAnchor::Middle,
            );
        }
        if !self.chart.y_label.is_empty() {
            svg = svg.text(8.0, area.top - 8.0, &self.chart.y_label, 11.0, palette::MUTED);
        }
        legend(svg, &[(self.chart.label.as_str(), self.chart.color)], self.width)
    }
}
