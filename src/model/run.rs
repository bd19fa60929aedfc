//! Run-level records served by `/eda/runs`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{format_id, lenient_f64, lenient_text};
use crate::error::Error;

/// Aggregated statistics over one 7–10 s measurement run.
///
/// Arrival order is preserved; the backend sorts by run id when it has one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RunRecord {
    /// Start of the run, as written by the acquisition pipeline.
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    /// Run identifier.
    #[serde(rename = "Run", default, deserialize_with = "lenient_f64")]
    pub run: Option<f64>,
    /// Number of samples aggregated into the run.
    #[serde(rename = "Rows", default, deserialize_with = "lenient_f64")]
    pub rows: Option<f64>,
    #[serde(rename = "Avg_HR_clean", default, deserialize_with = "lenient_f64")]
    pub avg_hr_clean: Option<f64>,
    #[serde(rename = "HR_SD", default, deserialize_with = "lenient_f64")]
    pub hr_sd: Option<f64>,
    #[serde(rename = "HR_P2P", default, deserialize_with = "lenient_f64")]
    pub hr_p2p: Option<f64>,
    #[serde(rename = "Avg_RR_clean", default, deserialize_with = "lenient_f64")]
    pub avg_rr_clean: Option<f64>,
    #[serde(rename = "RR_SD", default, deserialize_with = "lenient_f64")]
    pub rr_sd: Option<f64>,
    #[serde(rename = "RR_P2P", default, deserialize_with = "lenient_f64")]
    pub rr_p2p: Option<f64>,
    #[serde(rename = "Avg_Range", default, deserialize_with = "lenient_f64")]
    pub avg_range: Option<f64>,
    #[serde(rename = "Range_SD", default, deserialize_with = "lenient_f64")]
    pub range_sd: Option<f64>,
    #[serde(rename = "Range_Slope", default, deserialize_with = "lenient_f64")]
    pub range_slope: Option<f64>,
    /// Signal quality index.
    #[serde(rename = "SQI", default, deserialize_with = "lenient_f64")]
    pub sqi: Option<f64>,
    /// Calibrated heart rate.
    #[serde(rename = "Final_Accurate_HR", default, deserialize_with = "lenient_f64")]
    pub final_accurate_hr: Option<f64>,
    /// Reference reading from a wearable, when one was taken.
    #[serde(rename = "Apple_HR", default, deserialize_with = "lenient_f64")]
    pub apple_hr: Option<f64>,
    #[serde(rename = "HR_Class", default, deserialize_with = "lenient_text")]
    pub hr_class: Option<String>,
    #[serde(rename = "RR_Class", default, deserialize_with = "lenient_text")]
    pub rr_class: Option<String>,
    #[serde(rename = "Stress_Class", default, deserialize_with = "lenient_text")]
    pub stress_class: Option<String>,
}

impl RunRecord {
    /// Run id as an integer, when it is a whole number.
    #[must_use]
    pub fn run_id(&self) -> Option<i64> {
        self.run.filter(|r| r.fract() == 0.0).map(|r| r as i64)
    }

    /// Axis label: `Run N` when the run has a non-zero id, else the timestamp.
    #[must_use]
    pub fn label(&self) -> String {
        match self.run {
            Some(run) if run != 0.0 => format!("Run {}", format_id(run)),
            _ => self.timestamp.clone().unwrap_or_default(),
        }
    }

    /// Value of one numeric column.
    #[must_use]
    pub fn get(&self, feature: RunFeature) -> Option<f64> {
        feature.extract(self)
    }
}

/// Numeric columns of a [`RunRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum RunFeature {
    Run,
    Rows,
    AvgHrClean,
    HrSd,
    HrP2p,
    AvgRrClean,
    RrSd,
    RrP2p,
    AvgRange,
    RangeSd,
    RangeSlope,
    Sqi,
    FinalAccurateHr,
    AppleHr,
}

impl RunFeature {
    /// Every feature, in wire column order.
    pub const ALL: [RunFeature; 14] = [
        RunFeature::Run,
        RunFeature::Rows,
        RunFeature::AvgHrClean,
        RunFeature::HrSd,
        RunFeature::HrP2p,
        RunFeature::AvgRrClean,
        RunFeature::RrSd,
        RunFeature::RrP2p,
        RunFeature::AvgRange,
        RunFeature::RangeSd,
        RunFeature::RangeSlope,
        RunFeature::Sqi,
        RunFeature::FinalAccurateHr,
        RunFeature::AppleHr,
    ];

    /// Features summarized in the statistics overview.
    pub const OVERVIEW: [RunFeature; 6] = [
        RunFeature::AvgHrClean,
        RunFeature::AvgRrClean,
        RunFeature::AvgRange,
        RunFeature::RangeSd,
        RunFeature::Sqi,
        RunFeature::FinalAccurateHr,
    ];

    /// Column name on the wire.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            RunFeature::Run => "Run",
            RunFeature::Rows => "Rows",
            RunFeature::AvgHrClean => "Avg_HR_clean",
            RunFeature::HrSd => "HR_SD",
            RunFeature::HrP2p => "HR_P2P",
            RunFeature::AvgRrClean => "Avg_RR_clean",
            RunFeature::RrSd => "RR_SD",
            RunFeature::RrP2p => "RR_P2P",
            RunFeature::AvgRange => "Avg_Range",
            RunFeature::RangeSd => "Range_SD",
            RunFeature::RangeSlope => "Range_Slope",
            RunFeature::Sqi => "SQI",
            RunFeature::FinalAccurateHr => "Final_Accurate_HR",
            RunFeature::AppleHr => "Apple_HR",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RunFeature::Run => "Run",
            RunFeature::Rows => "Samples",
            RunFeature::AvgHrClean => "Avg HR (clean)",
            RunFeature::HrSd => "HR SD",
            RunFeature::HrP2p => "HR peak-to-peak",
            RunFeature::AvgRrClean => "Avg RR (clean)",
            RunFeature::RrSd => "RR SD",
            RunFeature::RrP2p => "RR peak-to-peak",
            RunFeature::AvgRange => "Avg Range",
            RunFeature::RangeSd => "Range SD",
            RunFeature::RangeSlope => "Range slope",
            RunFeature::Sqi => "SQI",
            RunFeature::FinalAccurateHr => "Final Accurate HR",
            RunFeature::AppleHr => "Reference HR",
        }
    }

    /// Read this column from a record.
    #[must_use]
    pub fn extract(self, record: &RunRecord) -> Option<f64> {
        match self {
            RunFeature::Run => record.run,
            RunFeature::Rows => record.rows,
            RunFeature::AvgHrClean => record.avg_hr_clean,
            RunFeature::HrSd => record.hr_sd,
            RunFeature::HrP2p => record.hr_p2p,
            RunFeature::AvgRrClean => record.avg_rr_clean,
            RunFeature::RrSd => record.rr_sd,
            RunFeature::RrP2p => record.rr_p2p,
            RunFeature::AvgRange => record.avg_range,
            RunFeature::RangeSd => record.range_sd,
            RunFeature::RangeSlope => record.range_slope,
            RunFeature::Sqi => record.sqi,
            RunFeature::FinalAccurateHr => record.final_accurate_hr,
            RunFeature::AppleHr => record.apple_hr,
        }
    }

    /// One column across many records, positions preserved.
    #[must_use]
    pub fn column_of(self, records: &[RunRecord]) -> Vec<Option<f64>> {
        records.iter().map(|r| self.extract(r)).collect()
    }
}

impl fmt::Display for RunFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for RunFeature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RunFeature::ALL
            .into_iter()
            .find(|f| f.column().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_JSON: &str = r#"{
        "Timestamp": "01-05-2024 10:00",
        "Run": 3,
        "Rows": "42",
        "Avg_HR_clean": 71.5,
        "Avg_RR_clean": null,
        "Avg_Range": "",
        "Range_SD": "0.012",
        "SQI": 215.0,
        "Final_Accurate_HR": "not-a-number",
        "HR_Class": "Normal",
        "Unexpected": [1, 2, 3]
    }"#;

    #[test]
    fn test_run_record_lenient_parse() {
        let run: RunRecord = serde_json::from_str(RUN_JSON).unwrap();
        assert_eq!(run.run_id(), Some(3));
        assert_eq!(run.rows, Some(42.0));
        assert_eq!(run.avg_hr_clean, Some(71.5));
        assert_eq!(run.avg_rr_clean, None);
        assert_eq!(run.avg_range, None);
        assert_eq!(run.range_sd, Some(0.012));
        assert_eq!(run.final_accurate_hr, None);
        assert_eq!(run.hr_class.as_deref(), Some("Normal"));
        assert_eq!(run.hr_sd, None);
    }

    #[test]
    fn test_run_label_prefers_run_id() {
        let run: RunRecord = serde_json::from_str(RUN_JSON).unwrap();
        assert_eq!(run.label(), "Run 3");
    }

    #[test]
    fn test_run_label_falls_back_to_timestamp() {
        let run = RunRecord {
            timestamp: Some("02-05-2024 11:30".to_string()),
            run: Some(0.0),
            ..RunRecord::default()
        };
        assert_eq!(run.label(), "02-05-2024 11:30");
        assert_eq!(RunRecord::default().label(), "");
    }

    #[test]
    fn test_feature_round_trip_names() {
        for feature in RunFeature::ALL {
            assert_eq!(feature.column().parse::<RunFeature>().unwrap(), feature);
        }
        assert_eq!("sqi".parse::<RunFeature>().unwrap(), RunFeature::Sqi);
        assert!("Heart_clean".parse::<RunFeature>().is_err());
    }

    #[test]
    fn test_column_of_keeps_positions() {
        let runs = vec![
            RunRecord {
                sqi: Some(10.0),
                ..RunRecord::default()
            },
            RunRecord::default(),
        ];
        assert_eq!(RunFeature::Sqi.column_of(&runs), vec![Some(10.0), None]);
    }
}
