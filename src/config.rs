//! Configuration for the dashboard.
//!
//! Supports YAML configuration with precedence: CLI > ENV > file > defaults.
//!
//! ```yaml
//! backends:
//!   eda: http://127.0.0.1:5001
//!   sensor: http://localhost:5001
//! http:
//!   timeout_secs: 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding [`BackendConfig::eda`].
pub const ENV_EDA_BASE: &str = "RADARIX_EDA_BASE";
/// Environment variable overriding [`BackendConfig::sensor`].
pub const ENV_SENSOR_BASE: &str = "RADARIX_SENSOR_BASE";
/// Environment variable overriding [`BackendConfig::pipeline`].
pub const ENV_PIPELINE_BASE: &str = "RADARIX_PIPELINE_BASE";
/// Environment variable overriding [`BackendConfig::auth`].
pub const ENV_AUTH_BASE: &str = "RADARIX_AUTH_BASE";

/// Base URLs of the external services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// EDA statistics backend (`/eda/*`, `/health`).
    #[serde(default = "default_eda")]
    pub eda: String,

    /// Sensor-control backend (`/run-sensor`, `/upload-data`).
    #[serde(default = "default_sensor")]
    pub sensor: String,

    /// Model pipeline backend (`/upload`, `/run_pipeline`).
    #[serde(default = "default_pipeline")]
    pub pipeline: String,

    /// Credential backend (`/get-users`, `/add-user`).
    #[serde(default = "default_auth")]
    pub auth: String,
}

fn default_eda() -> String {
    "http://127.0.0.1:5001".to_string()
}
fn default_sensor() -> String {
    "http://localhost:5001".to_string()
}
fn default_pipeline() -> String {
    "http://localhost:5002".to_string()
}
fn default_auth() -> String {
    "http://localhost:5003".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            eda: default_eda(),
            sensor: default_sensor(),
            pipeline: default_pipeline(),
            auth: default_auth(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for ordinary requests, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for sensor acquisition and the model pipeline, in seconds.
    /// A run holds the request open for the whole capture window.
    #[serde(default = "default_sensor_timeout_secs")]
    pub sensor_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_sensor_timeout_secs() -> u64 {
    120
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            sensor_timeout_secs: default_sensor_timeout_secs(),
        }
    }
}

/// Statistics report settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Bucket count for run-level histograms.
    #[serde(default = "default_run_bins")]
    pub run_bins: usize,

    /// Bucket count for sample-level histograms.
    #[serde(default = "default_sample_bins")]
    pub sample_bins: usize,

    /// Number of most recent runs summarized on the page.
    #[serde(default = "default_recent_runs")]
    pub recent_runs: usize,
}

fn default_run_bins() -> usize {
    crate::stats::DEFAULT_RUN_BINS
}
fn default_sample_bins() -> usize {
    crate::stats::DEFAULT_SAMPLE_BINS
}
fn default_recent_runs() -> usize {
    3
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            run_bins: default_run_bins(),
            sample_bins: default_sample_bins(),
            recent_runs: default_recent_runs(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Backend base URLs.
    #[serde(default)]
    pub backends: BackendConfig,

    /// HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            backends: BackendConfig::default(),
            http: HttpConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/radarix/config.yaml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("radarix").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails, or
    /// [`Error::ConfigInvalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    ///
    /// A missing file is expected; a broken one is logged and ignored.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::ConfigNotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring configuration file");
                Self::default()
            }
        }
    }

    /// Apply `RADARIX_*_BASE` overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `RADARIX_*_BASE` overrides from `lookup`. Empty values are ignored.
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let targets: [(&str, &mut String); 4] = [
            (ENV_EDA_BASE, &mut self.backends.eda),
            (ENV_SENSOR_BASE, &mut self.backends.sensor),
            (ENV_PIPELINE_BASE, &mut self.backends.pipeline),
            (ENV_AUTH_BASE, &mut self.backends.auth),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(key, value = %value, "backend override from environment");
                *slot = value.trim().to_string();
            }
        }
        self
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("backends.eda", &self.backends.eda),
            ("backends.sensor", &self.backends.sensor),
            ("backends.pipeline", &self.backends.pipeline),
            ("backends.auth", &self.backends.auth),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::ConfigInvalid {
                    key: key.to_string(),
                    message: format!("expected an http(s) URL, got '{url}'"),
                });
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::ConfigInvalid {
                key: "http.timeout_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        for (key, bins) in [
            ("report.run_bins", self.report.run_bins),
            ("report.sample_bins", self.report.sample_bins),
        ] {
            if bins == 0 {
                return Err(Error::ConfigInvalid {
                    key: key.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Timeout for ordinary requests.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Timeout for sensor runs and the model pipeline.
    #[must_use]
    pub fn sensor_timeout(&self) -> Duration {
        Duration::from_secs(self.http.sensor_timeout_secs.max(self.http.timeout_secs))
    }
}
