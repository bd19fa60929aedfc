//! Wire types for the backend collaborators.
//!
//! Every numeric field coming from the EDA backend is parsed leniently:
//! numbers, numeric strings, `null`, empty strings and garbage all decode,
//! the last three as `None`. Defaults are applied here, at the boundary,
//! so nothing downstream needs to second-guess a field.

mod eda;
mod run;
mod sample;
mod sensor;
mod table;

pub use eda::{AnomalyCounts, CorrelationMatrix, Health, Overview, ScatterPoint, StressMatrix};
pub use run::{RunFeature, RunRecord};
pub use sample::{SampleFeature, SampleRecord};
pub use sensor::{
    MlResults, PipelineResponse, SensorProfile, SensorRunRequest, SensorRunResponse,
    SensorStatus, UploadDataResponse, UploadResponse,
};
pub use table::RecordTable;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

/// Timestamp spellings the acquisition pipeline writes for "no timestamp".
const MISSING_TIMESTAMPS: &[&str] = &["", "nan", "None", "NaT", "null", "[]"];

/// A number that tolerates strings, nulls and junk.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct LenientF64(pub(crate) Option<f64>);

impl<'de> Deserialize<'de> for LenientF64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientF64Visitor).map(LenientF64)
    }
}

struct LenientF64Visitor;

impl<'de> Visitor<'de> for LenientF64Visitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v).filter(|v| v.is_finite()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// `deserialize_with` helper for lenient optional numbers.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    LenientF64::deserialize(d).map(|n| n.0)
}

/// `deserialize_with` helper for lenient non-negative counts.
pub(crate) fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(lenient_f64(d)?.filter(|v| *v >= 0.0).map(|v| v.round() as u64))
}

/// `deserialize_with` helper for timestamp-like text.
///
/// Numbers are kept as their decimal text; the pipeline's placeholder
/// spellings decode as `None`.
pub(crate) fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            Ok((!MISSING_TIMESTAMPS.contains(&v)).then(|| v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }
    }

    d.deserialize_any(TextVisitor)
}

/// Format a numeric identifier the way a person would write it: `3`, not `3.0`.
pub(crate) fn format_id(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_f64")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "lenient_text")]
        stamp: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lenient_number_variants() {
        assert_eq!(probe(r#"{"value": 72.5}"#).value, Some(72.5));
        assert_eq!(probe(r#"{"value": 3}"#).value, Some(3.0));
        assert_eq!(probe(r#"{"value": " 61.2 "}"#).value, Some(61.2));
        assert_eq!(probe(r#"{"value": ""}"#).value, None);
        assert_eq!(probe(r#"{"value": "abc"}"#).value, None);
        assert_eq!(probe(r#"{"value": "NaN"}"#).value, None);
        assert_eq!(probe(r#"{"value": null}"#).value, None);
        assert_eq!(probe(r#"{"value": [1, 2]}"#).value, None);
        assert_eq!(probe("{}").value, None);
    }

    #[test]
    fn test_lenient_text_placeholders() {
        assert_eq!(probe(r#"{"stamp": "NaT"}"#).stamp, None);
        assert_eq!(probe(r#"{"stamp": "nan"}"#).stamp, None);
        assert_eq!(probe(r#"{"stamp": ""}"#).stamp, None);
        assert_eq!(
            probe(r#"{"stamp": "01-05-2024 10:00"}"#).stamp.as_deref(),
            Some("01-05-2024 10:00")
        );
        assert_eq!(probe(r#"{"stamp": 17}"#).stamp.as_deref(), Some("17"));
    }

    #[test]
    fn test_format_id() {
        assert_eq!(format_id(3.0), "3");
        assert_eq!(format_id(2.5), "2.5");
        assert_eq!(format_id(-4.0), "-4");
    }
}
