//! The run-sensor control panel.

use std::fmt::Write as _;
use std::path::Path;

use crate::client::SensorClient;
use crate::error::{Error, Result};
use crate::model::{MlResults, SensorProfile};
use crate::notify::{self, Notice, Notifier};
use crate::output::{Card, TerminalEncoder};
use crate::session::Session;

/// Shown when a backend answers `success: false` without an `error`.
pub const GENERIC_FAILURE: &str = "Sensor run failed.";

/// State of the run-sensor panel across actions.
///
/// ML results survive failed actions; only a successful run or pipeline
/// replaces them.
pub struct RunSensorPanel<'a> {
    client: &'a SensorClient,
    email: String,
    notifier: Option<&'a dyn Notifier>,
    loading: bool,
    ml_results: Option<MlResults>,
    stats_text: Option<String>,
    predicted_hr: Option<f64>,
    notice: Option<Notice>,
}

impl std::fmt::Debug for RunSensorPanel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSensorPanel")
            .field("email", &self.email)
            .field("loading", &self.loading)
            .field("ml_results", &self.ml_results)
            .field("stats_text", &self.stats_text)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl<'a> RunSensorPanel<'a> {
    /// Open the panel for a logged-in session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without a logged-in session.
    pub fn new(client: &'a SensorClient, session: &Session) -> Result<Self> {
        let email = session.require_login()?.to_string();
        Ok(Self {
            client,
            email,
            notifier: None,
            loading: false,
            ml_results: None,
            stats_text: None,
            predicted_hr: None,
            notice: None,
        })
    }

    /// Forward every notice to `notifier` as it is raised.
    #[must_use]
    pub fn notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Whether an action is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Latest model outputs.
    #[must_use]
    pub fn ml_results(&self) -> Option<&MlResults> {
        self.ml_results.as_ref()
    }

    /// Summary text of the latest run.
    #[must_use]
    pub fn stats_text(&self) -> Option<&str> {
        self.stats_text.as_deref()
    }

    /// Heart rate predicted for the last uploaded recording.
    #[must_use]
    pub fn predicted_hr(&self) -> Option<f64> {
        self.predicted_hr
    }

    /// Most recent notice.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn raise(&mut self, notice: Notice) {
        match self.notifier {
            Some(n) => n.notify(&notice),
            None => notify::trace(&notice),
        }
        self.notice = Some(notice);
    }

    fn transport_failure(&mut self, action: &str, err: &Error) {
        tracing::warn!(action, error = %err, "sensor backend unreachable");
        self.raise(Notice::cannot_connect());
    }

    /// `GET /run-sensor`. Returns whether the sensor reported ready.
    pub async fn check_status(&mut self) -> bool {
        self.loading = true;
        let result = self.client.status().await;
        self.loading = false;
        match result {
            Ok(status) if status.success => {
                let message = status.output.unwrap_or_else(|| "Sensor is ready.".to_string());
                self.raise(Notice::info("Sensor", message));
                true
            }
            Ok(status) => {
                let message = status.error.unwrap_or_else(|| GENERIC_FAILURE.to_string());
                self.raise(Notice::error("Sensor", message));
                false
            }
            Err(e) => {
                self.transport_failure("status", &e);
                false
            }
        }
    }

    /// Capture one run with `profile` for the logged-in user.
    pub async fn run(&mut self, profile: SensorProfile) -> bool {
        self.loading = true;
        let result = self.client.run(&self.email, profile).await;
        self.loading = false;
        match result {
            Ok(resp) if resp.success => {
                if resp.ml_results.is_some() {
                    self.ml_results = resp.ml_results;
                }
                self.stats_text = resp.stats_text;
                self.raise(Notice::info("Sensor run", "Run completed."));
                true
            }
            Ok(resp) => {
                let message = resp.error.unwrap_or_else(|| GENERIC_FAILURE.to_string());
                self.raise(Notice::error("Sensor run", message));
                false
            }
            Err(e) => {
                self.transport_failure("run", &e);
                false
            }
        }
    }

    /// Upload a recording to the pipeline backend.
    pub async fn upload(&mut self, file: &Path) -> bool {
        self.loading = true;
        let result = self.client.upload(file).await;
        self.loading = false;
        match result {
            Ok(resp) => match resp.error {
                Some(error) => {
                    self.raise(Notice::error("Upload", error));
                    false
                }
                None => {
                    let message = resp.message.unwrap_or_else(|| "File uploaded.".to_string());
                    self.raise(Notice::info("Upload", message));
                    true
                }
            },
            Err(e @ Error::Io(_)) => {
                self.raise(Notice::error("Upload", e.to_string()));
                false
            }
            Err(e) => {
                self.transport_failure("upload", &e);
                false
            }
        }
    }

    /// Run the model pipeline over the uploaded recording.
    pub async fn run_pipeline(&mut self) -> bool {
        self.loading = true;
        let result = self.client.run_pipeline().await;
        self.loading = false;
        match result {
            Ok(resp) => {
                if let Some(failure) = resp.failure() {
                    self.raise(Notice::error("Pipeline", failure));
                    return false;
                }
                if let Some(results) = resp.results() {
                    self.ml_results = Some(results.clone());
                }
                let message = resp.message.unwrap_or_else(|| "Pipeline completed.".to_string());
                self.raise(Notice::info("Pipeline", message));
                true
            }
            Err(e) => {
                self.transport_failure("run_pipeline", &e);
                false
            }
        }
    }

    /// Upload a recording to the sensor backend for direct scoring.
    pub async fn upload_data(&mut self, file: &Path) -> bool {
        self.loading = true;
        let result = self.client.upload_data(file).await;
        self.loading = false;
        match result {
            Ok(resp) if resp.success => {
                self.predicted_hr = resp.predicted_hr;
                let message = resp.predicted_hr.map_or_else(
                    || "Upload scored.".to_string(),
                    |hr| format!("Predicted HR: {hr:.1} bpm"),
                );
                self.raise(Notice::info("Upload", message));
                true
            }
            Ok(resp) => {
                let message = resp.error.unwrap_or_else(|| GENERIC_FAILURE.to_string());
                self.raise(Notice::error("Upload", message));
                false
            }
            Err(e @ Error::Io(_)) => {
                self.raise(Notice::error("Upload", e.to_string()));
                false
            }
            Err(e) => {
                self.transport_failure("upload_data", &e);
                false
            }
        }
    }

    /// Current panel contents for a terminal.
    #[must_use]
    pub fn render_terminal(&self, enc: &TerminalEncoder) -> String {
        let mut out = String::new();
        if let Some(notice) = &self.notice {
            let _ = writeln!(out, "{notice}\n");
        }
        if let Some(results) = &self.ml_results {
            let card = results
                .rows()
                .into_iter()
                .fold(Card::new("ML Results"), |card, (label, value)| card.row(label, value));
            out.push_str(&enc.card(&card));
        }
        if let Some(text) = &self.stats_text {
            out.push('\n');
            out.push_str(text.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> SensorClient {
        let dead = "http://127.0.0.1:9";
        SensorClient::new(dead, dead, Duration::from_millis(200)).unwrap()
    }

    #[test]
    fn test_panel_requires_login() {
        let client = client();
        assert!(matches!(
            RunSensorPanel::new(&client, &Session::default()),
            Err(Error::NotLoggedIn)
        ));
        let panel = RunSensorPanel::new(&client, &Session::logged_in("a@b.c")).unwrap();
        assert!(!panel.is_loading());
        assert!(panel.ml_results().is_none());
    }

    #[tokio::test]
    async fn test_missing_upload_file_is_not_a_connection_error() {
        let client = client();
        let mut panel = RunSensorPanel::new(&client, &Session::logged_in("a@b.c")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(!panel.upload(&dir.path().join("missing.csv")).await);
        let notice = panel.notice().unwrap();
        assert!(notice.is_error());
        assert_ne!(notice.message, notify::CANNOT_CONNECT);
    }

    #[test]
    fn test_render_terminal_without_results() {
        let client = client();
        let panel = RunSensorPanel::new(&client, &Session::logged_in("a@b.c")).unwrap();
        assert!(panel.render_terminal(&TerminalEncoder::new()).is_empty());
    }
}
