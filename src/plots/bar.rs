//! Grouped bar chart.

use super::{category_labels, frame, legend, no_data, y_axis, Plot, PlotArea};
use crate::charts::CategoryChart;
use crate::error::{Error, Result};
use crate::output::SvgEncoder;
use crate::scale::{BandScale, LinearScale, Scale};

/// Builder for grouped bar charts (one bar per dataset per category).
///
/// Missing values leave their slot empty.
#[derive(Debug, Clone)]
pub struct BarPlot {
    chart: CategoryChart,
    title: String,
    width: u32,
    height: u32,
    show_legend: bool,
}

impl BarPlot {
    /// Create a bar plot over a chart payload.
    #[must_use]
    pub fn new(chart: CategoryChart) -> Self {
        Self {
            chart,
            title: String::new(),
            width: 640,
            height: 320,
            show_legend: true,
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

    /// Show or hide the legend.
    #[must_use]
    pub fn legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] when there is no present value, and
    /// [`Error::DataLengthMismatch`] when a dataset does not match the labels.
    pub fn build(self) -> Result<Self> {
        if self.chart.is_empty() {
            return Err(Error::EmptyData);
        }
        if let Some(ds) = self
            .chart
            .datasets
            .iter()
            .find(|d| d.data.len() != self.chart.labels.len())
        {
            return Err(Error::DataLengthMismatch {
                x_len: self.chart.labels.len(),
                y_len: ds.data.len(),
            });
        }
        Ok(self)
    }
}

impl Plot for BarPlot {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn to_svg(&self) -> SvgEncoder {
        let values: Vec<f64> = self.chart.datasets.iter().flat_map(|d| d.values()).collect();
        let area = PlotArea::inset(self.width, self.height, false);
        let Some(y) = LinearScale::from_data(values, (area.bottom, area.top)) else {
            return no_data(self.width, self.height, &self.title);
        };
        // Bars grow from zero, so only pad away from it.
        let (lo, hi) = y.include_zero().domain();
        let pad = (hi - lo) * 0.05;
        let lo = if lo < 0.0 { lo - pad } else { lo };
        let y = LinearScale::new((lo, hi + pad), (area.bottom, area.top));

        let bands = BandScale::new(self.chart.labels.len(), (area.left, area.right));
        let series = self.chart.datasets.len().max(1);
        let bar_width = bands.bandwidth() / series as f64;
        let baseline = y.scale(0.0).clamp(area.top, area.bottom);

        let mut svg = y_axis(frame(self.width, self.height, &self.title), &y, &area, false, true);

        for (s, ds) in self.chart.datasets.iter().enumerate() {
            for (i, value) in ds.data.iter().enumerate() {
                let Some(v) = value else { continue };
                let x = bands.scale(i) + bar_width * s as f64;
                let top = y.scale(*v);
                let (y0, h) = if top <= baseline {
                    (top, baseline - top)
                } else {
                    (baseline, top - baseline)
                };
                svg = svg.rect(x, y0, (bar_width - 1.0).max(1.0), h.max(0.5), ds.background_color);
            }
        }

        svg = category_labels(svg, &self.chart.labels, |i| bands.center(i), &area);

        if self.show_legend {
            let items: Vec<(&str, _)> = self
                .chart
                .datasets
                .iter()
                .map(|d| (d.label.as_str(), d.stroke()))
                .collect();
            svg = legend(svg, &items, self.width);
        }
        svg
    }
}
