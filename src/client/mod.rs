//! HTTP clients for the external backends.
//!
//! Every backend is a black box with a JSON contract. Requests are issued
//! once: no retries, no de-duplication, no cancellation. Failures map onto
//! [`Error`] so callers can tell "unreachable" ([`Error::Connection`]) from
//! "answered badly" ([`Error::Status`], [`Error::Json`]).

mod credentials;
mod eda;
mod sensor;

pub use credentials::{AddUserResponse, CredentialsClient, UserRecord};
pub use eda::EdaClient;
pub use sensor::SensorClient;

use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;

use crate::error::{Error, Result};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("radarix/", env!("CARGO_PKG_VERSION"));

/// Shared request plumbing: base URL joining, timeout, JSON decoding.
///
/// GET responses must carry a success status. POST responses are decoded
/// whenever the body parses, whatever the status, because the sensor and
/// pipeline backends report failures as `{"error": ...}` with a 4xx/5xx.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: String,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client for `base` (scheme, host and port, optional path prefix).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] if the TLS backend cannot be initialized.
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ConfigInvalid {
                key: "http".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// GET `path` and decode a JSON body.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] when unreachable, [`Error::Status`] for a
    /// non-2xx status, [`Error::Json`] when the body does not decode.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let body = self.execute("GET", &url, self.client.get(&url), true).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `path` with query parameters and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get_json`].
    pub async fn get_json_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let body = self
            .execute("GET", &url, self.client.get(&url).query(query), true)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `path` and return the body as text.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] when unreachable, [`Error::Status`] for a
    /// non-2xx status.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        self.execute("GET", &url, self.client.get(&url), true).await
    }

    /// POST a JSON body to `path` and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] when unreachable; [`Error::Status`] when the
    /// status is an error and the body does not decode as `T`.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        self.post(&url, self.client.post(&url).json(body)).await
    }

    /// POST with an empty body.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post_json`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        self.post(&url, self.client.post(&url)).await
    }

    /// POST a local file as multipart field `field`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise the same as
    /// [`HttpClient::post_json`].
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file: &Path,
    ) -> Result<T> {
        let bytes = tokio::fs::read(file).await?;
        let name = file
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(name);
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        let url = self.url(path);
        self.post(&url, self.client.post(&url).multipart(form)).await
    }

    async fn post<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let body = self.execute("POST", url, request, false).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request and read the body. With `strict`, a non-2xx status is
    /// an error; otherwise it is only an error when the body is not JSON.
    async fn execute(
        &self,
        method: &'static str,
        url: &str,
        request: RequestBuilder,
        strict: bool,
    ) -> Result<String> {
        let span = tracing::debug_span!("http", method, url);
        async move {
            let started = Instant::now();
            let response: Response = request
                .send()
                .await
                .map_err(|e| Error::from_reqwest(url, &e))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| Error::from_reqwest(url, &e))?;
            tracing::debug!(
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "response"
            );

            if status.is_success() {
                return Ok(body);
            }
            if !strict && serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                tracing::debug!(status = status.as_u16(), "decoding error body");
                return Ok(body);
            }
            Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
        .instrument(span)
        .await
    }
}
