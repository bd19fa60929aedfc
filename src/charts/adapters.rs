//! Pure functions from records and statistics to chart payloads.

use super::{
    CategoryChart, Dataset, FeatureSummary, HeatmapCell, HeatmapChart, PieChart, RunOverview,
    ScatterChart,
};
use crate::color::{correlation_color, palette};
use crate::error::{Error, Result};
use crate::model::{CorrelationMatrix, RunFeature, RunRecord, ScatterPoint};
use crate::stats::{describe, finite, HistogramBins};

/// SQI at or above which a run counts as high quality.
pub const SQI_HIGH_THRESHOLD: f64 = 200.0;
/// SQI below which a run counts as low quality.
pub const SQI_LOW_THRESHOLD: f64 = 50.0;

/// Category label for each run, in arrival order.
#[must_use]
pub fn run_labels(runs: &[RunRecord]) -> Vec<String> {
    runs.iter().map(RunRecord::label).collect()
}

/// Avg HR (clean) against Final Accurate HR, one bar pair per run.
#[must_use]
pub fn hr_bar_chart(runs: &[RunRecord]) -> CategoryChart {
    CategoryChart {
        labels: run_labels(runs),
        datasets: vec![
            Dataset::new(
                "Avg HR (clean)",
                RunFeature::AvgHrClean.column_of(runs),
                palette::HR.with_opacity(0.9),
            ),
            Dataset::new(
                "Final Accurate HR",
                RunFeature::FinalAccurateHr.column_of(runs),
                palette::FINAL_HR.with_opacity(0.9),
            ),
        ],
    }
}

/// Avg HR and Avg RR over runs.
#[must_use]
pub fn hr_rr_line_chart(runs: &[RunRecord]) -> CategoryChart {
    CategoryChart {
        labels: run_labels(runs),
        datasets: vec![
            Dataset::new(
                "Avg HR (clean)",
                RunFeature::AvgHrClean.column_of(runs),
                palette::HR.with_opacity(0.07),
            )
            .border(palette::HR),
            Dataset::new(
                "Avg RR (clean)",
                RunFeature::AvgRrClean.column_of(runs),
                palette::RR.with_opacity(0.07),
            )
            .border(palette::RR),
        ],
    }
}

/// Runs bucketed by SQI: high (≥ 200), medium (50 to 200), low (< 50).
///
/// Runs without a finite SQI are not counted.
#[must_use]
pub fn sqi_pie_chart(runs: &[RunRecord]) -> PieChart {
    let sqi = finite(RunFeature::Sqi.column_of(runs));
    let count = |pred: &dyn Fn(f64) -> bool| sqi.iter().filter(|v| pred(**v)).count() as u64;
    PieChart {
        labels: vec![
            "High SQI".to_string(),
            "Medium SQI".to_string(),
            "Low SQI".to_string(),
        ],
        data: vec![
            count(&|v| v >= SQI_HIGH_THRESHOLD),
            count(&|v| (SQI_LOW_THRESHOLD..SQI_HIGH_THRESHOLD).contains(&v)),
            count(&|v| v < SQI_LOW_THRESHOLD),
        ],
        colors: vec![palette::SQI_HIGH, palette::SQI_MEDIUM, palette::SQI_LOW],
    }
}

/// Scatter of one run feature against another.
///
/// Every run contributes a point, in order; missing coordinates stay `None`.
#[must_use]
pub fn scatter(runs: &[RunRecord], x: RunFeature, y: RunFeature, label: &str) -> ScatterChart {
    let points = runs
        .iter()
        .map(|r| ScatterPoint {
            x: x.extract(r),
            y: y.extract(r),
            run: r.run_id(),
        })
        .collect();
    ScatterChart::new(label, points).axes(x.label(), y.label())
}

/// Avg HR against SQI.
#[must_use]
pub fn hr_sqi_scatter(runs: &[RunRecord]) -> ScatterChart {
    scatter(runs, RunFeature::Sqi, RunFeature::AvgHrClean, "HR vs SQI").with_color(palette::HR)
}

/// Avg HR against range standard deviation.
#[must_use]
pub fn hr_range_sd_scatter(runs: &[RunRecord]) -> ScatterChart {
    scatter(runs, RunFeature::RangeSd, RunFeature::AvgHrClean, "HR vs Range_SD")
        .with_color(palette::ORANGE)
}

/// Avg HR against Avg RR.
#[must_use]
pub fn hr_rr_scatter(runs: &[RunRecord]) -> ScatterChart {
    scatter(runs, RunFeature::AvgRrClean, RunFeature::AvgHrClean, "Avg HR vs Avg RR")
        .with_color(palette::EMERALD)
}

/// Avg HR against average range.
#[must_use]
pub fn hr_range_scatter(runs: &[RunRecord]) -> ScatterChart {
    scatter(runs, RunFeature::AvgRange, RunFeature::AvgHrClean, "Avg HR vs Avg Range")
        .with_color(palette::SKY)
}

/// Final Accurate HR against Avg HR (clean).
#[must_use]
pub fn final_vs_clean_scatter(runs: &[RunRecord]) -> ScatterChart {
    scatter(
        runs,
        RunFeature::AvgHrClean,
        RunFeature::FinalAccurateHr,
        "Final Accurate HR vs Avg Clean HR",
    )
    .with_color(palette::PINK)
}

/// Pair two equal-length collections into points.
///
/// Every pair is kept; non-finite values become `None`.
///
/// # Errors
///
/// Returns [`Error::DataLengthMismatch`] when the lengths differ.
pub fn pair_points(xs: &[Option<f64>], ys: &[Option<f64>]) -> Result<Vec<ScatterPoint>> {
    if xs.len() != ys.len() {
        return Err(Error::DataLengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    Ok(xs
        .iter()
        .zip(ys)
        .map(|(x, y)| ScatterPoint {
            x: x.filter(|v| v.is_finite()),
            y: y.filter(|v| v.is_finite()),
            run: None,
        })
        .collect())
}

/// Bar chart of a histogram, labeled by bin midpoints.
///
/// Returns `None` when the histogram has fewer than two edges.
#[must_use]
pub fn histogram_bar_chart(hist: &HistogramBins, label: &str) -> Option<CategoryChart> {
    if hist.bins.len() < 2 {
        return None;
    }
    Some(CategoryChart {
        labels: hist.midpoint_labels(2),
        datasets: vec![Dataset::new(
            label,
            hist.counts.iter().map(|c| Some(*c as f64)).collect(),
            palette::HISTOGRAM.with_opacity(0.85),
        )],
    })
}

/// Color and text for every cell of a correlation matrix.
///
/// Cells beyond a short row, and `null` coefficients, render as `-`.
#[must_use]
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> HeatmapChart {
    let n = matrix.columns.len();
    let cells = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let value = matrix.cell(i, j).filter(|v| !v.is_nan());
                    HeatmapCell {
                        value,
                        text: value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}")),
                        color: value.map_or(palette::EMPTY_CELL, |v| correlation_color(Some(v))),
                    }
                })
                .collect()
        })
        .collect();
    HeatmapChart {
        columns: matrix.columns.clone(),
        cells,
    }
}

/// Descriptive statistics over the overview features, plus the run count.
#[must_use]
pub fn run_overview(runs: &[RunRecord]) -> RunOverview {
    RunOverview {
        runs: runs.len(),
        features: RunFeature::OVERVIEW
            .into_iter()
            .map(|feature| FeatureSummary {
                column: feature.column(),
                label: feature.label(),
                stats: describe(feature.column_of(runs)),
            })
            .collect(),
    }
}
