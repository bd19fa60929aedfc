//! Error types for radarix operations.
//!
//! The variants follow the dashboard's failure taxonomy: transport failures
//! ([`Error::Connection`]), application-level rejections from a backend
//! ([`Error::Backend`], [`Error::Status`]), and malformed payloads
//! ([`Error::Json`], [`Error::NoData`]). Everything else is local: I/O,
//! configuration, session and validation errors.

use std::io;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the dashboard can report.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a CSV, writing a report or the session file failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// The backend could not be reached (connect failure, timeout, DNS).
    #[error("cannot connect to backend at {url}: {message}")]
    Connection {
        /// URL that was requested.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The backend answered but reported an application failure.
    #[error("{endpoint} failed: {message}")]
    Backend {
        /// Endpoint path, e.g. `/run-sensor`.
        endpoint: &'static str,
        /// Error text reported by the backend, or a generic message.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV document could not be decoded.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A dataset was empty or malformed and carries nothing to show.
    #[error("no data for {0}")]
    NoData(String),

    /// A chart was built without a single plottable value.
    #[error("nothing to plot")]
    EmptyData,

    /// Labels and values of a series disagree in length.
    #[error("series mismatch: {x_len} labels but {y_len} values")]
    DataLengthMismatch {
        /// Number of labels (or matrix columns).
        x_len: usize,
        /// Number of values (or row cells).
        y_len: usize,
    },

    /// The YAML config file is malformed.
    #[error("config line {line}: {message}")]
    ConfigParse {
        /// 1-based line reported by the YAML parser.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// No config file at the given path.
    #[error("no config file at {0}")]
    ConfigNotFound(String),

    /// A config value is out of range.
    #[error("config key '{key}': {message}")]
    ConfigInvalid {
        /// Dotted key, e.g. `backends.eda_url`.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A protected view was entered without a logged-in session.
    #[error("You must log in to access this page.")]
    NotLoggedIn,

    /// Email/password pair did not match any known user.
    #[error("Invalid login details")]
    InvalidCredentials,

    /// User input failed validation; the message is shown verbatim.
    #[error("{0}")]
    Validation(String),

    /// Unknown feature or column name.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
}

impl Error {
    /// Whether this error means the backend was never reached.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Error::NoData(format!("{url}: {err}"));
        }
        Error::Connection {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Connection {
            url: "http://localhost:5001/run-sensor".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("cannot connect"));
        assert!(err.is_connection());
    }

    #[test]
    fn test_series_mismatch_message() {
        let err = Error::DataLengthMismatch { x_len: 3, y_len: 2 };
        assert_eq!(err.to_string(), "series mismatch: 3 labels but 2 values");
    }

    #[test]
    fn test_config_parse_names_line() {
        let err = Error::ConfigParse {
            line: 7,
            message: "expected a mapping".to_string(),
        };
        assert_eq!(err.to_string(), "config line 7: expected a mapping");
    }

    #[test]
    fn test_backend_error_carries_endpoint() {
        let err = Error::Backend {
            endpoint: "/run_pipeline",
            message: "Pipeline error".to_string(),
        };
        assert_eq!(err.to_string(), "/run_pipeline failed: Pipeline error");
        assert!(!err.is_connection());
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = Error::Validation("Passwords do not match.".to_string());
        assert_eq!(err.to_string(), "Passwords do not match.");
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(Error::InvalidCredentials.to_string(), "Invalid login details");
    }

    #[test]
    fn test_io_converts_and_is_not_connection() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "missing.csv").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_connection());
    }

    #[test]
    fn test_errors_cross_tasks() {
        fn sendable<T: Send + Sync + 'static>() {}
        sendable::<Error>();
    }
}
