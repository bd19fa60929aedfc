//! Summary payloads served by the EDA backend.

use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient_count, lenient_f64, LenientF64};

/// Server-side overview (`/eda/overview`).
///
/// Every field is optional; the dashboard prints `-` for anything missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Overview {
    /// Number of runs.
    #[serde(default, alias = "runs_count", deserialize_with = "lenient_count")]
    pub runs: Option<u64>,
    /// Mean of per-run clean heart rate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_hr: Option<f64>,
    /// Mean of per-run clean respiration rate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_rr: Option<f64>,
    /// Mean of per-run average range (m).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_range: Option<f64>,
    /// Mean SQI.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sqi_mean: Option<f64>,
    /// SQI standard deviation.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sqi_std: Option<f64>,
    /// Runs with SQI above 200.
    #[serde(default, deserialize_with = "lenient_count")]
    pub good_sqi: Option<u64>,
    /// Mean calibrated heart rate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_hr_mean: Option<f64>,
    /// Calibrated heart rate standard deviation.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_hr_std: Option<f64>,
    /// Lowest calibrated heart rate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_hr_min: Option<f64>,
    /// Highest calibrated heart rate.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_hr_max: Option<f64>,
}

/// Correlation matrix over merged sample/run columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column names; rows and columns share the same order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Row-major coefficients. May be empty or ragged.
    #[serde(default, deserialize_with = "lenient_matrix")]
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient at `(row, col)`, `None` when missing.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.matrix.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn lenient_matrix<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<Option<f64>>>, D::Error> {
    let raw = Option::<Vec<Vec<LenientF64>>>::deserialize(d)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(|c| c.0).collect())
        .collect())
}

/// Run counts with and without anomaly flags (`/eda/anomalies`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalyCounts {
    /// Runs with no flags.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ok: u64,
    /// Runs with at least one flag.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub not_ok: u64,
}

impl AnomalyCounts {
    /// Total runs inspected.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.ok + self.not_ok
    }
}

fn count_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(lenient_count(d)?.unwrap_or(0))
}

/// One `(x, y)` pair from `/eda/scatter`.
///
/// Missing coordinates are kept as `None` so point positions line up with
/// the runs they came from; renderers skip them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Horizontal value.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: Option<f64>,
    /// Vertical value.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: Option<f64>,
    /// Run the point came from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<i64>,
}

impl ScatterPoint {
    /// Point with both coordinates present.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            run: None,
        }
    }

    /// Both coordinates, when present and finite.
    #[must_use]
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }
}

/// Heart-rate class × stress class contingency table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StressMatrix {
    /// Stress classes (columns).
    #[serde(default)]
    pub labels: Vec<String>,
    /// Heart-rate classes (rows).
    #[serde(default)]
    pub index: Vec<String>,
    /// Counts, row-major.
    #[serde(default)]
    pub matrix: Vec<Vec<u64>>,
}

/// `/health` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Health {
    /// Whether the backend reports itself healthy.
    #[serde(default)]
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_partial() {
        let json = r#"{"runs": 12, "avg_hr": 70.25, "sqi_std": null, "good_sqi": 4}"#;
        let overview: Overview = serde_json::from_str(json).unwrap();
        assert_eq!(overview.runs, Some(12));
        assert_eq!(overview.avg_hr, Some(70.25));
        assert_eq!(overview.sqi_std, None);
        assert_eq!(overview.good_sqi, Some(4));
        assert_eq!(overview.final_hr_max, None);
    }

    #[test]
    fn test_overview_runs_count_alias() {
        let overview: Overview = serde_json::from_str(r#"{"runs_count": 7}"#).unwrap();
        assert_eq!(overview.runs, Some(7));
    }

    #[test]
    fn test_correlation_ragged_rows() {
        let json = r#"{"columns":["a","b"],"matrix":[[1.0, 0.5],[null]]}"#;
        let corr: CorrelationMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(corr.cell(0, 1), Some(0.5));
        assert_eq!(corr.cell(1, 0), None);
        assert_eq!(corr.cell(1, 1), None);
        assert_eq!(corr.cell(5, 5), None);
        assert!(!corr.is_empty());
    }

    #[test]
    fn test_correlation_columns_without_matrix() {
        let corr: CorrelationMatrix =
            serde_json::from_str(r#"{"columns":["a"],"matrix":[]}"#).unwrap();
        assert_eq!(corr.cell(0, 0), None);
        assert!(CorrelationMatrix::default().is_empty());
    }

    #[test]
    fn test_anomalies_default_zero() {
        let counts: AnomalyCounts = serde_json::from_str(r#"{"ok": 5}"#).unwrap();
        assert_eq!(counts, AnomalyCounts { ok: 5, not_ok: 0 });
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_scatter_point_keeps_missing_coordinates() {
        let json = r#"[{"x": 14.2, "y": "70.1", "run": 4}, {"x": null, "y": 72.0}, {"y": 1.0}]"#;
        let points: Vec<ScatterPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].coords(), Some((14.2, 70.1)));
        assert_eq!(points[1].x, None);
        assert_eq!(points[1].coords(), None);
        assert_eq!(points[2].y, Some(1.0));
        assert_eq!(ScatterPoint::new(f64::NAN, 1.0).coords(), None);
    }

    #[test]
    fn test_stress_matrix_shape() {
        let json = r#"{"labels":["High","Low"],"index":["Normal"],"matrix":[[2,3]]}"#;
        let m: StressMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(m.matrix[0], vec![2, 3]);
    }
}
