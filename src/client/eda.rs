//! EDA statistics backend.

use std::time::Duration;

use serde_json::Value;

use super::HttpClient;
use crate::config::Config;
use crate::error::Result;
use crate::model::{
    AnomalyCounts, CorrelationMatrix, Health, Overview, RunRecord, ScatterPoint, StressMatrix,
};
use crate::stats::{BoxStats, HistogramBins};

/// Client for `/eda/*`.
#[derive(Debug, Clone)]
pub struct EdaClient {
    http: HttpClient,
}

impl EdaClient {
    /// Create a client for the backend at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(base, timeout)?,
        })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.backends.eda, config.timeout())
    }

    /// `GET /eda/runs`: every run record, in arrival order.
    pub async fn runs(&self) -> Result<Vec<RunRecord>> {
        let value: Value = self.http.get_json("/eda/runs").await?;
        // Anything but an array means "no runs".
        match value {
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            _ => Ok(Vec::new()),
        }
    }

    /// `GET /eda/overview`.
    pub async fn overview(&self) -> Result<Overview> {
        self.http.get_json("/eda/overview").await
    }

    /// `GET /eda/correlation_merged`.
    pub async fn correlation_merged(&self) -> Result<CorrelationMatrix> {
        self.http.get_json("/eda/correlation_merged").await
    }

    /// `GET /eda/anomalies`. Missing counts are zero.
    pub async fn anomalies(&self) -> Result<AnomalyCounts> {
        self.http.get_json("/eda/anomalies").await
    }

    /// `GET /eda/histogram?feature=&bins=`.
    ///
    /// `Ok(None)` when the backend has fewer than two edges for `feature`.
    pub async fn histogram(&self, feature: &str, bins: usize) -> Result<Option<HistogramBins>> {
        let query = [("feature", feature.to_string()), ("bins", bins.to_string())];
        let hist: HistogramBins = self.http.get_json_with("/eda/histogram", &query).await?;
        Ok(hist.is_renderable().then_some(hist))
    }

    /// `GET /eda/boxplot?feature=`.
    ///
    /// `Ok(None)` when the backend answers with an empty object.
    pub async fn boxplot(&self, feature: &str) -> Result<Option<BoxStats>> {
        let value: Value = self.http.get_json_with("/eda/boxplot", &[("feature", feature)]).await?;
        match value {
            Value::Object(ref map) if map.is_empty() => Ok(None),
            Value::Null => Ok(None),
            _ => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// `GET /eda/scatter?x=&y=`: finite pairs of two columns.
    pub async fn scatter(&self, x: &str, y: &str) -> Result<Vec<ScatterPoint>> {
        self.http.get_json_with("/eda/scatter", &[("x", x), ("y", y)]).await
    }

    /// `GET /eda/hypothesis/hr_stress_matrix`: HR class × stress class counts.
    pub async fn stress_matrix(&self) -> Result<StressMatrix> {
        self.http.get_json("/eda/hypothesis/hr_stress_matrix").await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Health> {
        self.http.get_json("/health").await
    }
}
