//! Chart payloads and the adapters that build them.
//!
//! Payloads mirror the labeled-series structure used by browser chart
//! libraries and serialize with camelCase keys, so `radarix report --json`
//! can feed a front end directly. The same payloads drive the SVG plots in
//! [`crate::plots`].

mod adapters;

pub use adapters::{
    correlation_heatmap, final_vs_clean_scatter, histogram_bar_chart, hr_bar_chart,
    hr_range_scatter, hr_range_sd_scatter, hr_rr_line_chart, hr_rr_scatter, hr_sqi_scatter,
    pair_points, run_labels, run_overview, scatter, sqi_pie_chart, SQI_HIGH_THRESHOLD,
    SQI_LOW_THRESHOLD,
};

use serde::Serialize;

use crate::color::{palette, Rgba};
use crate::model::{RunFeature, ScatterPoint};
use crate::stats::DescriptiveStats;

/// One labeled series of a category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Legend text.
    pub label: String,
    /// One value per category label; `None` keeps the slot empty.
    pub data: Vec<Option<f64>>,
    /// Bar fill, or area fill under a line.
    pub background_color: Rgba,
    /// Line color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Rgba>,
}

impl Dataset {
    /// Create a series filled with `color`.
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<Option<f64>>, color: Rgba) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: color,
            border_color: None,
        }
    }

    /// Set the line color.
    #[must_use]
    pub fn border(mut self, color: Rgba) -> Self {
        self.border_color = Some(color);
        self
    }

    /// Color used for lines and legend swatches.
    #[must_use]
    pub fn stroke(&self) -> Rgba {
        self.border_color.unwrap_or(self.background_color)
    }

    /// Present values, in order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().filter_map(|v| *v)
    }
}

/// Labeled multi-series chart (bar or line).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryChart {
    /// Category axis labels.
    pub labels: Vec<String>,
    /// Series sharing the label axis.
    pub datasets: Vec<Dataset>,
}

impl CategoryChart {
    /// Whether there is no category or no present value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.values().next().is_none())
    }
}

/// Pie chart of counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PieChart {
    /// Slice labels.
    pub labels: Vec<String>,
    /// Slice counts.
    pub data: Vec<u64>,
    /// Slice colors.
    pub colors: Vec<Rgba>,
}

impl PieChart {
    /// Sum of all slices.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }

    /// Whether any slice is non-zero.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.total() > 0
    }
}

/// Scatter series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterChart {
    /// Legend text.
    pub label: String,
    /// Horizontal axis title.
    pub x_label: String,
    /// Vertical axis title.
    pub y_label: String,
    /// Points in run order, each tagged with its run. Gaps are kept.
    pub points: Vec<ScatterPoint>,
    /// Point color.
    pub color: Rgba,
}

impl ScatterChart {
    /// Create a series with the default point color.
    #[must_use]
    pub fn new(label: impl Into<String>, points: Vec<ScatterPoint>) -> Self {
        Self {
            label: label.into(),
            x_label: String::new(),
            y_label: String::new(),
            points,
            color: palette::HR,
        }
    }

    /// Set the axis titles.
    #[must_use]
    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Set the point color.
    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Points with both coordinates present.
    pub fn plottable(&self) -> impl Iterator<Item = (&ScatterPoint, f64, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.coords().map(|(x, y)| (p, x, y)))
    }

    /// Whether there is nothing to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plottable().next().is_none()
    }
}

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    /// Coefficient, `None` when missing.
    pub value: Option<f64>,
    /// Display text: three decimals, or `-`.
    pub text: String,
    /// Cell background.
    pub color: Rgba,
}

/// Square correlation heatmap.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HeatmapChart {
    /// Row and column names.
    pub columns: Vec<String>,
    /// Row-major cells, `columns.len()` × `columns.len()`.
    pub cells: Vec<Vec<HeatmapCell>>,
}

impl HeatmapChart {
    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Descriptive statistics of one run feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    /// Wire column name.
    pub column: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Statistics over the finite values of the column.
    #[serde(flatten)]
    pub stats: DescriptiveStats,
}

/// Client-side overview computed from `/eda/runs`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunOverview {
    /// Number of run records fetched.
    pub runs: usize,
    /// One summary per overview feature.
    pub features: Vec<FeatureSummary>,
}

impl RunOverview {
    /// Statistics for one feature, if it is part of the overview.
    #[must_use]
    pub fn get(&self, feature: RunFeature) -> Option<&DescriptiveStats> {
        self.features
            .iter()
            .find(|f| f.column == feature.column())
            .map(|f| &f.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_serializes_camel_case() {
        let ds = Dataset::new("HR", vec![Some(1.0), None], palette::HR).border(palette::RR);
        let json = serde_json::to_value(&ds).unwrap();
        assert_eq!(json["backgroundColor"], "rgb(59,130,246)");
        assert_eq!(json["borderColor"], "rgb(251,113,133)");
        assert_eq!(json["data"], serde_json::json!([1.0, null]));
    }

    #[test]
    fn test_category_chart_empty_when_all_missing() {
        let chart = CategoryChart {
            labels: vec!["Run 1".to_string()],
            datasets: vec![Dataset::new("HR", vec![None], palette::HR)],
        };
        assert!(chart.is_empty());
        assert!(CategoryChart::default().is_empty());
    }

    #[test]
    fn test_pie_has_data() {
        let pie = PieChart {
            labels: vec!["a".into(), "b".into()],
            data: vec![0, 0],
            colors: vec![Rgba::BLACK, Rgba::WHITE],
        };
        assert!(!pie.has_data());
        assert_eq!(pie.total(), 0);
    }

    #[test]
    fn test_scatter_builder() {
        let chart = ScatterChart::new("HR vs SQI", Vec::new())
            .axes("SQI", "HR")
            .with_color(palette::PINK);
        assert!(chart.is_empty());
        assert_eq!(chart.x_label, "SQI");
        assert_eq!(chart.color, palette::PINK);
        let json = serde_json::to_value(&chart).unwrap();
        assert!(json.get("xLabel").is_some());
    }

    #[test]
    fn test_scatter_with_only_gaps_is_empty() {
        let gap = ScatterPoint {
            x: None,
            y: Some(70.0),
            run: Some(2),
        };
        let chart = ScatterChart::new("HR vs SQI", vec![gap, ScatterPoint::new(1.0, 2.0)]);
        assert!(!chart.is_empty());
        assert_eq!(chart.plottable().count(), 1);
        let json = serde_json::to_value(&chart).unwrap();
        assert!(json["points"][0]["x"].is_null());
        assert_eq!(json["points"][0]["run"], 2);

        let gaps_only = ScatterChart::new("HR vs SQI", vec![gap]);
        assert!(gaps_only.is_empty());
    }
}
