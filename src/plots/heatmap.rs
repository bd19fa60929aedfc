//! Correlation heatmap.

use super::{frame, no_data, Plot};
use crate::charts::HeatmapChart;
use crate::color::palette;
use crate::error::{Error, Result};
use crate::output::{SvgEncoder, TextAnchor};

/// Builder for a square heatmap with the value printed in each cell.
#[derive(Debug, Clone)]
pub struct HeatmapPlot {
    chart: HeatmapChart,
    title: String,
    cell_size: f64,
    label_width: f64,
    show_values: bool,
}

impl HeatmapPlot {
    /// Create a heatmap over a chart payload.
    #[must_use]
    pub fn new(chart: HeatmapChart) -> Self {
        Self {
            chart,
            title: String::new(),
            cell_size: 64.0,
            label_width: 110.0,
            show_values: true,
        }
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Set the cell edge length in pixels.
    #[must_use]
    pub fn cell_size(mut self, size: f64) -> Self {
        self.cell_size = size.max(8.0);
        self
    }

    /// Print the cell text.
    #[must_use]
    pub fn show_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] for a matrix without columns, and
    /// [`Error::DataLengthMismatch`] when a row is not square.
    pub fn build(self) -> Result<Self> {
        let n = self.chart.columns.len();
        if n == 0 {
            return Err(Error::EmptyData);
        }
        if self.chart.cells.len() != n {
            return Err(Error::DataLengthMismatch {
                x_len: n,
                y_len: self.chart.cells.len(),
            });
        }
        if let Some(row) = self.chart.cells.iter().find(|r| r.len() != n) {
            return Err(Error::DataLengthMismatch {
                x_len: n,
                y_len: row.len(),
            });
        }
        Ok(self)
    }

    fn top(&self) -> f64 {
        48.0 + 22.0
    }
}

impl Plot for HeatmapPlot {
    fn dimensions(&self) -> (u32, u32) {
        if self.chart.is_empty() {
            return (360, 140);
        }
        let n = self.chart.columns.len() as f64;
        let w = self.label_width + n * self.cell_size + 20.0;
        let h = self.top() + n * self.cell_size + 20.0;
        (w.ceil() as u32, h.ceil() as u32)
    }

    fn to_svg(&self) -> SvgEncoder {
        let (width, height) = self.dimensions();
        if self.chart.is_empty() {
            return no_data(width, height, &self.title);
        }

        let left = self.label_width;
        let top = self.top();
        let size = self.cell_size;
        let font = (size / 5.0).clamp(8.0, 13.0);
        let mut svg = frame(width, height, &self.title);

        for (j, name) in self.chart.columns.iter().enumerate() {
            let cx = left + (j as f64 + 0.5) * size;
            svg = svg.text_anchored(cx, top - 8.0, name, 11.0, palette::TICK, TextAnchor::Middle);
        }

        for (i, row) in self.chart.cells.iter().enumerate() {
            let y = top + i as f64 * size;
            if let Some(name) = self.chart.columns.get(i) {
                svg = svg.text_anchored(
                    left - 8.0,
                    y + size / 2.0 + 4.0,
                    name,
                    11.0,
                    palette::TICK,
                    TextAnchor::End,
                );
            }
            for (j, cell) in row.iter().enumerate() {
                let x = left + j as f64 * size;
                svg = svg.rect_outlined(x, y, size, size, 0.0, cell.color, palette::CARD, 1.0);
                if self.show_values {
                    svg = svg.text_anchored(
                        x + size / 2.0,
                        y + size / 2.0 + font / 3.0,
                        &cell.text,
                        font,
                        palette::TEXT,
                        TextAnchor::Middle,
                    );
                }
            }
        }
        svg
    }
}
