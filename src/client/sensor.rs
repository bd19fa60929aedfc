//! Sensor-control and model-pipeline backends.

use std::path::Path;
use std::time::Duration;

use super::HttpClient;
use crate::config::Config;
use crate::error::Result;
use crate::model::{
    PipelineResponse, SensorProfile, SensorRunRequest, SensorRunResponse, SensorStatus,
    UploadDataResponse, UploadResponse,
};

/// Multipart field carrying uploaded files.
pub const UPLOAD_FIELD: &str = "file";

/// Client for the sensor backend (`/run-sensor`, `/upload-data`) and the
/// pipeline backend (`/upload`, `/run_pipeline`).
#[derive(Debug, Clone)]
pub struct SensorClient {
    sensor: HttpClient,
    pipeline: HttpClient,
}

impl SensorClient {
    /// Create a client for the two backends.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(sensor_base: &str, pipeline_base: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            sensor: HttpClient::new(sensor_base, timeout)?,
            pipeline: HttpClient::new(pipeline_base, timeout)?,
        })
    }

    /// Create a client from configuration, using the long sensor timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.backends.sensor,
            &config.backends.pipeline,
            config.sensor_timeout(),
        )
    }

    /// `GET /run-sensor`: whether the acquisition script is reachable.
    pub async fn status(&self) -> Result<SensorStatus> {
        self.sensor.get_json("/run-sensor").await
    }

    /// `POST /run-sensor`: capture one run for `email` with `profile`.
    pub async fn run(&self, email: &str, profile: SensorProfile) -> Result<SensorRunResponse> {
        let request = SensorRunRequest {
            user_email: email.to_string(),
            configuration: profile,
        };
        tracing::info!(email, %profile, "starting sensor run");
        self.sensor.post_json("/run-sensor", &request).await
    }

    /// `POST /upload`: send a recording to the pipeline backend.
    pub async fn upload(&self, file: &Path) -> Result<UploadResponse> {
        self.pipeline.post_file("/upload", UPLOAD_FIELD, file).await
    }

    /// `POST /run_pipeline`: run the model over the last upload.
    pub async fn run_pipeline(&self) -> Result<PipelineResponse> {
        self.pipeline.post_empty("/run_pipeline").await
    }

    /// `POST /upload-data`: upload a recording and get a heart-rate prediction.
    pub async fn upload_data(&self, file: &Path) -> Result<UploadDataResponse> {
        self.sensor.post_file("/upload-data", UPLOAD_FIELD, file).await
    }
}
