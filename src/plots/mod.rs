//! High-level plot types.
//!
//! Each plot is a builder over a chart payload from [`crate::charts`] (or a
//! [`BoxStats`](crate::stats::BoxStats) bundle) and renders to an
//! [`SvgEncoder`] in the dark dashboard theme.

mod bar;
mod boxplot;
mod heatmap;
mod line;
mod pie;
mod scatter;

pub use bar::BarPlot;
pub use boxplot::BoxPlot;
pub use heatmap::HeatmapPlot;
pub use line::LinePlot;
pub use pie::PiePlot;
pub use scatter::ScatterPlot;

use std::path::Path;

use crate::color::{palette, Rgba};
use crate::error::Result;
use crate::output::{SvgEncoder, TextAnchor};
use crate::scale::{LinearScale, Scale};

/// Something that renders to an SVG document.
pub trait Plot {
    /// Output size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Build the SVG document.
    fn to_svg(&self) -> SvgEncoder;

    /// Render to an SVG string.
    fn render_svg(&self) -> String {
        self.to_svg().render()
    }

    /// Write the SVG document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    fn write_svg<P: AsRef<Path>>(&self, path: P) -> Result<()>
    where
        Self: Sized,
    {
        self.to_svg().write_to_file(path)
    }
}

const TITLE_SIZE: f64 = 15.0;
const LABEL_SIZE: f64 = 11.0;

/// Pixel rectangle the data is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlotArea {
    pub(crate) left: f64,
    pub(crate) top: f64,
    pub(crate) right: f64,
    pub(crate) bottom: f64,
}

impl PlotArea {
    /// Area inside a `width` × `height` canvas with room for title and axes.
    pub(crate) fn inset(width: u32, height: u32, right_axis: bool) -> Self {
        let right_margin = if right_axis { 56.0 } else { 20.0 };
        Self {
            left: 56.0,
            top: 48.0,
            right: (f64::from(width) - right_margin).max(57.0),
            bottom: (f64::from(height) - 44.0).max(49.0),
        }
    }

    pub(crate) fn width(&self) -> f64 {
        self.right - self.left
    }

    pub(crate) fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Card background with a title.
pub(crate) fn frame(width: u32, height: u32, title: &str) -> SvgEncoder {
    let svg = SvgEncoder::new(width, height)
        .background(Some(palette::CARD))
        .rect_outlined(
            0.5,
            0.5,
            f64::from(width) - 1.0,
            f64::from(height) - 1.0,
            10.0,
            palette::CARD,
            palette::BORDER,
            1.0,
        );
    if title.is_empty() {
        svg
    } else {
        svg.title(16.0, 26.0, title, TITLE_SIZE, palette::TEXT)
    }
}

/// Centered "No data" placeholder inside a frame.
pub(crate) fn no_data(width: u32, height: u32, title: &str) -> SvgEncoder {
    frame(width, height, title).text_anchored(
        f64::from(width) / 2.0,
        f64::from(height) / 2.0,
        "No data",
        13.0,
        palette::MUTED,
        TextAnchor::Middle,
    )
}

/// Horizontal grid lines with tick labels on the left (or right) edge.
pub(crate) fn y_axis(
    mut svg: SvgEncoder,
    scale: &LinearScale,
    area: &PlotArea,
    right_side: bool,
    grid: bool,
) -> SvgEncoder {
    for tick in scale.ticks(5) {
        let y = scale.scale(tick);
        if grid {
            svg = svg.line(area.left, y, area.right, y, palette::GRID, 1.0);
        }
        let (x, anchor) = if right_side {
            (area.right + 6.0, TextAnchor::Start)
        } else {
            (area.left - 6.0, TextAnchor::End)
        };
        svg = svg.text_anchored(x, y + 4.0, &format_tick(tick), LABEL_SIZE, palette::TICK, anchor);
    }
    svg
}

/// Vertical grid lines with tick labels under the plot area.
pub(crate) fn x_axis(mut svg: SvgEncoder, scale: &LinearScale, area: &PlotArea) -> SvgEncoder {
    for tick in scale.ticks(6) {
        let x = scale.scale(tick);
        svg = svg.line(x, area.top, x, area.bottom, palette::GRID, 1.0).text_anchored(
            x,
            area.bottom + 16.0,
            &format_tick(tick),
            LABEL_SIZE,
            palette::TICK,
            TextAnchor::Middle,
        );
    }
    svg
}

/// Category labels under evenly spaced positions, thinned to fit.
pub(crate) fn category_labels(
    mut svg: SvgEncoder,
    labels: &[String],
    centers: impl Fn(usize) -> f64,
    area: &PlotArea,
) -> SvgEncoder {
    let max_labels = ((area.width() / 70.0).floor() as usize).max(1);
    let every = labels.len().div_ceil(max_labels).max(1);
    for (i, label) in labels.iter().enumerate().step_by(every) {
        svg = svg.text_anchored(
            centers(i),
            area.bottom + 16.0,
            label,
            LABEL_SIZE,
            palette::TICK,
            TextAnchor::Middle,
        );
    }
    svg
}

/// Legend swatches in a row at the top-right of the frame.
pub(crate) fn legend(mut svg: SvgEncoder, items: &[(&str, Rgba)], width: u32) -> SvgEncoder {
    let mut x = f64::from(width) - 16.0;
    for (label, color) in items.iter().rev() {
        let text_width = label.chars().count() as f64 * 6.5;
        x -= text_width;
        svg = svg.text(x, 26.0, label, LABEL_SIZE, palette::TEXT);
        x -= 16.0;
        svg = svg.rect(x, 17.0, 11.0, 11.0, color.with_alpha(255));
        x -= 14.0;
    }
    svg
}

/// Tick label text: whole numbers for large values, more decimals for small.
pub(crate) fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        "0".to_string()
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else if a >= 1.0 {
        trim_zeros(&format!("{v:.2}"))
    } else {
        trim_zeros(&format!("{v:.3}"))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
