//! Line chart over a category axis.

use super::{category_labels, frame, legend, no_data, y_axis, Plot, PlotArea};
use crate::charts::{CategoryChart, Dataset};
use crate::error::{Error, Result};
use crate::output::SvgEncoder;
use crate::scale::{BandScale, LinearScale, Scale};

/// Builder for line charts.
///
/// A missing value breaks the line; isolated points still get a marker.
/// With [`LinePlot::dual_axis`], the second dataset is scaled against its own
/// axis on the right, which keeps heart rate and respiration rate readable
/// on one chart.
#[derive(Debug, Clone)]
pub struct LinePlot {
    chart: CategoryChart,
    title: String,
    width: u32,
    height: u32,
    dual_axis: bool,
    fill: bool,
    line_width: f64,
}

impl LinePlot {
    /// Create a line plot over a chart payload.
    #[must_use]
    pub fn new(chart: CategoryChart) -> Self {
        Self {
            chart,
            title: String::new(),
            width: 640,
            height: 320,
            dual_axis: false,
            fill: true,
            line_width: 2.0,
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

    /// Scale the second dataset against a right-hand axis.
    #[must_use]
    pub fn dual_axis(mut self, dual: bool) -> Self {
        self.dual_axis = dual;
        self
    }

    /// Fill the area under each line with the dataset background color.
    #[must_use]
    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    /// Set the line width in pixels.
    #[must_use]
    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = width.max(0.5);
        self
    }

    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] when there is no present value.
    pub fn build(self) -> Result<Self> {
        if self.chart.is_empty() {
            return Err(Error::EmptyData);
        }
        Ok(self)
    }

    fn uses_right_axis(&self) -> bool {
        self.dual_axis && self.chart.datasets.len() > 1
    }

    fn scale_for(&self, datasets: &[&Dataset], area: &PlotArea) -> Option<LinearScale> {
        LinearScale::from_data(
            datasets.iter().flat_map(|d| d.values()),
            (area.bottom, area.top),
        )
        .map(|s| s.padded(0.08))
    }
}

/// Split a series into runs of consecutive present points.
fn segments(
    data: &[Option<f64>],
    x: impl Fn(usize) -> f64,
    y: &LinearScale,
) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, v) in data.iter().enumerate() {
        match v {
            Some(v) if v.is_finite() => current.push((x(i), y.scale(*v))),
            _ => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

impl Plot for LinePlot {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn to_svg(&self) -> SvgEncoder {
        let right = self.uses_right_axis();
        let area = PlotArea::inset(self.width, self.height, right);
        let (left_sets, right_sets): (Vec<&Dataset>, Vec<&Dataset>) = if right {
            (
                self.chart.datasets.iter().take(1).collect(),
                self.chart.datasets.iter().skip(1).collect(),
            )
        } else {
            (self.chart.datasets.iter().collect(), Vec::new())
        };

        let Some(left_scale) = self
            .scale_for(&left_sets, &area)
            .or_else(|| self.scale_for(&right_sets, &area))
        else {
            return no_data(self.width, self.height, &self.title);
        };
        let right_scale = self.scale_for(&right_sets, &area);

        let mut svg = frame(self.width, self.height, &self.title);
        svg = y_axis(svg, &left_scale, &area, false, true);
        if let Some(rs) = &right_scale {
            svg = y_axis(svg, rs, &area, true, false);
        }

        let bands = BandScale::new(self.chart.labels.len(), (area.left, area.right)).padding(0.0);
        let x = |i: usize| bands.center(i);

        for (index, ds) in self.chart.datasets.iter().enumerate() {
            let scale = match (&right_scale, right && index > 0) {
                (Some(rs), true) => rs,
                _ => &left_scale,
            };
            for segment in segments(&ds.data, x, scale) {
                if self.fill && segment.len() > 1 {
                    let mut polygon = segment.clone();
                    if let (Some(first), Some(last)) = (segment.first(), segment.last()) {
                        polygon.push((last.0, area.bottom));
                        polygon.push((first.0, area.bottom));
                    }
                    svg = svg.polygon(&polygon, ds.background_color, None, 0.0);
                }
                if segment.len() > 1 {
                    svg = svg.polyline(&segment, ds.stroke(), self.line_width);
                }
                for (px, py) in &segment {
                    svg = svg.circle(*px, *py, self.line_width + 0.5, ds.stroke());
                }
            }
        }

        svg = category_labels(svg, &self.chart.labels, x, &area);
        let items: Vec<(&str, _)> = self
            .chart
            .datasets
            .iter()
            .map(|d| (d.label.as_str(), d.stroke()))
            .collect();
        legend(svg, &items, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;

    fn chart(hr: Vec<Option<f64>>, rr: Vec<Option<f64>>) -> CategoryChart {
        let labels = (1..=hr.len()).map(|i| format!("Run {i}")).collect();
        CategoryChart {
            labels,
            datasets: vec![
                Dataset::new("HR", hr, palette::HR.with_opacity(0.07)).border(palette::HR),
                Dataset::new("RR", rr, palette::RR.with_opacity(0.07)).border(palette::RR),
            ],
        }
    }

    #[test]
    fn test_segments_break_on_missing() {
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        let segs = segments(&[Some(1.0), Some(2.0), None, Some(3.0)], |i| i as f64, &y);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].len(), 2);
        assert_eq!(segs[1], vec![(3.0, 70.0)]);
    }

    #[test]
    fn test_line_plot_gap_produces_two_polylines() {
        let plot = LinePlot::new(chart(
            vec![Some(70.0), Some(72.0), None, Some(71.0), Some(69.0)],
            vec![None; 5],
        ))
        .fill(false);
        let svg = plot.build().unwrap().render_svg();
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_dual_axis_adds_right_ticks() {
        let c = chart(vec![Some(70.0), Some(80.0)], vec![Some(12.0), Some(16.0)]);
        let single = LinePlot::new(c.clone()).render_svg();
        let dual = LinePlot::new(c).dual_axis(true).render_svg();
        assert!(dual.matches("<text").count() > single.matches("<text").count());
    }

    #[test]
    fn test_line_plot_all_missing() {
        let plot = LinePlot::new(chart(vec![None], vec![None]));
        assert!(matches!(plot.clone().build(), Err(Error::EmptyData)));
        assert!(plot.render_svg().contains("No data"));
    }
}
