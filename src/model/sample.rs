//! Frame-level radar samples.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{lenient_f64, lenient_text};
use crate::error::Error;

/// One radar-frame measurement.
///
/// The acquisition scripts wrote the filtered rates under several names over
/// time; the older spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Wall-clock time of the frame.
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    /// User the session belongs to.
    #[serde(rename = "User", default, deserialize_with = "lenient_text")]
    pub user: Option<String>,
    /// Seconds since the session started.
    #[serde(rename = "SessionTime", default, deserialize_with = "lenient_f64")]
    pub session_time: Option<f64>,
    /// Unfiltered heart rate (bpm).
    #[serde(rename = "HeartRate_raw", default, deserialize_with = "lenient_f64")]
    pub heart_rate_raw: Option<f64>,
    /// Filtered heart rate (bpm).
    #[serde(
        rename = "Heart_clean",
        alias = "HeartRate_BPM",
        alias = "HeartRate",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub heart_clean: Option<f64>,
    /// Unfiltered respiration rate (breaths/min).
    #[serde(rename = "RespirationRate_raw", default, deserialize_with = "lenient_f64")]
    pub respiration_rate_raw: Option<f64>,
    /// Filtered respiration rate (breaths/min).
    #[serde(
        rename = "Resp_clean",
        alias = "RespirationRate_BPM",
        alias = "RespirationRate",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub resp_clean: Option<f64>,
    /// Unfiltered target range (m).
    #[serde(rename = "Range_raw", default, deserialize_with = "lenient_f64")]
    pub range_raw: Option<f64>,
    /// Filtered target range (m).
    #[serde(
        rename = "Range_clean",
        alias = "Range_m",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub range_clean: Option<f64>,
    /// Heart waveform amplitude.
    #[serde(rename = "HeartWaveform", default, deserialize_with = "lenient_f64")]
    pub heart_waveform: Option<f64>,
    /// Breathing waveform amplitude.
    #[serde(rename = "BreathWaveform", default, deserialize_with = "lenient_f64")]
    pub breath_waveform: Option<f64>,
    /// Heart rate from the FFT peak.
    #[serde(rename = "HeartRate_FFT", default, deserialize_with = "lenient_f64")]
    pub heart_rate_fft: Option<f64>,
    /// Breathing rate from the FFT peak.
    #[serde(rename = "BreathRate_FFT", default, deserialize_with = "lenient_f64")]
    pub breath_rate_fft: Option<f64>,
    /// Sensor configuration index used for the frame.
    #[serde(rename = "ConfigurationFile", default, deserialize_with = "lenient_f64")]
    pub configuration: Option<f64>,
}

impl SampleRecord {
    /// Value of one numeric column.
    #[must_use]
    pub fn get(&self, feature: SampleFeature) -> Option<f64> {
        feature.extract(self)
    }
}

/// Numeric columns of a [`SampleRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum SampleFeature {
    SessionTime,
    HeartRateRaw,
    HeartClean,
    RespirationRateRaw,
    RespClean,
    RangeRaw,
    RangeClean,
    HeartWaveform,
    BreathWaveform,
    HeartRateFft,
    BreathRateFft,
    Configuration,
}

impl SampleFeature {
    /// Every feature, in wire column order.
    pub const ALL: [SampleFeature; 12] = [
        SampleFeature::SessionTime,
        SampleFeature::HeartRateRaw,
        SampleFeature::HeartClean,
        SampleFeature::RespirationRateRaw,
        SampleFeature::RespClean,
        SampleFeature::RangeRaw,
        SampleFeature::RangeClean,
        SampleFeature::HeartWaveform,
        SampleFeature::BreathWaveform,
        SampleFeature::HeartRateFft,
        SampleFeature::BreathRateFft,
        SampleFeature::Configuration,
    ];

    /// Sample-level features the statistics view charts.
    pub const CHARTED: [SampleFeature; 3] = [
        SampleFeature::HeartClean,
        SampleFeature::RespClean,
        SampleFeature::RangeClean,
    ];

    /// Column name on the wire.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            SampleFeature::SessionTime => "SessionTime",
            SampleFeature::HeartRateRaw => "HeartRate_raw",
            SampleFeature::HeartClean => "Heart_clean",
            SampleFeature::RespirationRateRaw => "RespirationRate_raw",
            SampleFeature::RespClean => "Resp_clean",
            SampleFeature::RangeRaw => "Range_raw",
            SampleFeature::RangeClean => "Range_clean",
            SampleFeature::HeartWaveform => "HeartWaveform",
            SampleFeature::BreathWaveform => "BreathWaveform",
            SampleFeature::HeartRateFft => "HeartRate_FFT",
            SampleFeature::BreathRateFft => "BreathRate_FFT",
            SampleFeature::Configuration => "ConfigurationFile",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SampleFeature::SessionTime => "Session time",
            SampleFeature::HeartRateRaw => "Heart (raw)",
            SampleFeature::HeartClean => "Heart",
            SampleFeature::RespirationRateRaw => "Resp (raw)",
            SampleFeature::RespClean => "Resp",
            SampleFeature::RangeRaw => "Range (raw)",
            SampleFeature::RangeClean => "Range",
            SampleFeature::HeartWaveform => "Heart waveform",
            SampleFeature::BreathWaveform => "Breath waveform",
            SampleFeature::HeartRateFft => "Heart (FFT)",
            SampleFeature::BreathRateFft => "Breath (FFT)",
            SampleFeature::Configuration => "Configuration",
        }
    }

    /// Read this column from a record.
    #[must_use]
    pub fn extract(self, record: &SampleRecord) -> Option<f64> {
        match self {
            SampleFeature::SessionTime => record.session_time,
            SampleFeature::HeartRateRaw => record.heart_rate_raw,
            SampleFeature::HeartClean => record.heart_clean,
            SampleFeature::RespirationRateRaw => record.respiration_rate_raw,
            SampleFeature::RespClean => record.resp_clean,
            SampleFeature::RangeRaw => record.range_raw,
            SampleFeature::RangeClean => record.range_clean,
            SampleFeature::HeartWaveform => record.heart_waveform,
            SampleFeature::BreathWaveform => record.breath_waveform,
            SampleFeature::HeartRateFft => record.heart_rate_fft,
            SampleFeature::BreathRateFft => record.breath_rate_fft,
            SampleFeature::Configuration => record.configuration,
        }
    }

    /// One column across many records, positions preserved.
    #[must_use]
    pub fn column_of(self, records: &[SampleRecord]) -> Vec<Option<f64>> {
        records.iter().map(|r| self.extract(r)).collect()
    }
}

impl fmt::Display for SampleFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SampleFeature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let alias = match s {
            "HeartRate_BPM" | "HeartRate" => Some(SampleFeature::HeartClean),
            "RespirationRate_BPM" | "RespirationRate" => Some(SampleFeature::RespClean),
            "Range_m" => Some(SampleFeature::RangeClean),
            _ => None,
        };
        alias
            .or_else(|| {
                SampleFeature::ALL
                    .into_iter()
                    .find(|f| f.column().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_aliases() {
        let json = r#"{"Timestamp":"01-05-2024 10:00:01","User":"a@b.c","SessionTime":"1.5",
            "HeartRate_BPM":72,"RespirationRate_BPM":14.5,"Range_m":0.61,"ConfigurationFile":1}"#;
        let sample: SampleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(sample.heart_clean, Some(72.0));
        assert_eq!(sample.resp_clean, Some(14.5));
        assert_eq!(sample.range_clean, Some(0.61));
        assert_eq!(sample.session_time, Some(1.5));
        assert_eq!(sample.configuration, Some(1.0));
        assert_eq!(sample.user.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_sample_from_csv() {
        let data = "Timestamp,User,Heart_clean,Resp_clean,Range_clean\n\
                    01-05-2024 10:00,u1,70.5,,0.5\n\
                    01-05-2024 10:01,u1,abc,15,0.6\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let samples: Vec<SampleRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].heart_clean, Some(70.5));
        assert_eq!(samples[0].resp_clean, None);
        assert_eq!(samples[1].heart_clean, None);
        assert_eq!(samples[1].resp_clean, Some(15.0));
    }

    #[test]
    fn test_feature_parse_accepts_aliases() {
        assert_eq!("Range_m".parse::<SampleFeature>().unwrap(), SampleFeature::RangeClean);
        assert_eq!("heart_clean".parse::<SampleFeature>().unwrap(), SampleFeature::HeartClean);
        assert!("SQI".parse::<SampleFeature>().is_err());
    }

    #[test]
    fn test_get_reads_column() {
        let sample = SampleRecord {
            breath_rate_fft: Some(12.0),
            ..SampleRecord::default()
        };
        assert_eq!(sample.get(SampleFeature::BreathRateFft), Some(12.0));
        assert_eq!(sample.get(SampleFeature::HeartClean), None);
    }
}
