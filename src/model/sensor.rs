//! Requests and responses of the sensor-control and pipeline backends.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{lenient_f64, lenient_text};
use crate::error::Error;

/// Radar chirp configuration loaded before acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorProfile {
    /// Subject facing the sensor (`0`).
    #[default]
    Front,
    /// Sensor behind the subject (`1`).
    Back,
}

impl SensorProfile {
    /// Wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            SensorProfile::Front => 0,
            SensorProfile::Back => 1,
        }
    }

    /// Profile from its wire value.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SensorProfile::Front),
            1 => Some(SensorProfile::Back),
            _ => None,
        }
    }
}

impl Serialize for SensorProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl fmt::Display for SensorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorProfile::Front => f.write_str("front"),
            SensorProfile::Back => f.write_str("back"),
        }
    }
}

impl FromStr for SensorProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "front" => Ok(SensorProfile::Front),
            "1" | "back" => Ok(SensorProfile::Back),
            other => Err(Error::Validation(format!(
                "unknown sensor profile '{other}' (expected 0|front or 1|back)"
            ))),
        }
    }
}

/// Body of `POST /run-sensor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRunRequest {
    /// Logged-in user the measurement is stored under.
    pub user_email: String,
    /// Chirp profile.
    pub configuration: SensorProfile,
}

/// `GET /run-sensor` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorStatus {
    /// Whether the acquisition script is available.
    #[serde(default)]
    pub success: bool,
    /// Script stdout, when the backend forwards it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Model outputs for one measurement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MlResults {
    /// Predicted heart rate (bpm).
    #[serde(
        rename = "Predicted_HR",
        alias = "predicted_hr",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub predicted_hr: Option<f64>,
    /// Heart-rate class.
    #[serde(rename = "HR_Class", alias = "hr_class", default, deserialize_with = "lenient_text")]
    pub hr_class: Option<String>,
    /// Respiration-rate class.
    #[serde(rename = "RR_Class", alias = "rr_class", default, deserialize_with = "lenient_text")]
    pub rr_class: Option<String>,
    /// Stress class.
    #[serde(
        rename = "Stress_Class",
        alias = "stress_class",
        default,
        deserialize_with = "lenient_text"
    )]
    pub stress_class: Option<String>,
    /// Any other key the model emitted.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MlResults {
    /// Whether none of the known outputs is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicted_hr.is_none()
            && self.hr_class.is_none()
            && self.rr_class.is_none()
            && self.stress_class.is_none()
    }

    /// Label/value rows for display, `-` for missing values.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        vec![
            (
                "Predicted HR",
                self.predicted_hr
                    .map_or_else(|| "-".to_string(), |hr| format!("{hr:.1} bpm")),
            ),
            ("HR Class", text(&self.hr_class)),
            ("RR Class", text(&self.rr_class)),
            ("Stress Class", text(&self.stress_class)),
        ]
    }
}

/// `POST /run-sensor` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorRunResponse {
    /// Whether acquisition and inference completed.
    #[serde(default)]
    pub success: bool,
    /// Human-readable run summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_text: Option<String>,
    /// Model outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_results: Option<MlResults>,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /upload` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Success text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /run_pipeline` response.
///
/// Older pipeline builds return the model outputs under `model_output`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineResponse {
    /// Success text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Model outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_results: Option<MlResults>,
    /// Model outputs, legacy key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_output: Option<MlResults>,
    /// Failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure detail (usually the pipeline's stderr).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PipelineResponse {
    /// Model outputs under whichever key the backend used.
    #[must_use]
    pub fn results(&self) -> Option<&MlResults> {
        self.ml_results.as_ref().or(self.model_output.as_ref())
    }

    /// Failure text with details appended, if the pipeline failed.
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        self.error.as_ref().map(|e| match &self.details {
            Some(d) if !d.trim().is_empty() => format!("{e}: {}", d.trim()),
            _ => e.clone(),
        })
    }
}

/// `POST /upload-data` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadDataResponse {
    /// Whether the upload was scored.
    #[serde(default)]
    pub success: bool,
    /// Predicted heart rate for the uploaded recording.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub predicted_hr: Option<f64>,
    /// Failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
