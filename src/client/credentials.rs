//! Credential backend (`/get-users`, `/add-user`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::HttpClient;
use crate::config::Config;
use crate::error::Result;

/// One `email,password` row of the credential list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login email.
    pub email: String,
    /// Plaintext password, as stored by the backend.
    pub password: String,
}

/// `POST /add-user` answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AddUserResponse {
    /// Whether the user was added.
    #[serde(default)]
    pub success: bool,
    /// Reason for a refusal, e.g. "Email already exists.".
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct AddUserRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the credential backend.
#[derive(Debug, Clone)]
pub struct CredentialsClient {
    http: HttpClient,
}

impl CredentialsClient {
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
        Self::new(&config.backends.auth, config.timeout())
    }

    /// `GET /get-users`: the credential list.
    pub async fn users(&self) -> Result<Vec<UserRecord>> {
        let text = self.http.get_text("/get-users").await?;
        parse_users(&text)
    }

    /// `POST /add-user`.
    pub async fn add_user(&self, email: &str, password: &str) -> Result<AddUserResponse> {
        self.http
            .post_json("/add-user", &AddUserRequest { email, password })
            .await
    }
}

/// Parse `email,password` CSV text. The first row is a header; blank lines
/// and rows without a password column are skipped.
pub(crate) fn parse_users(text: &str) -> Result<Vec<UserRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut users = Vec::new();
    for record in reader.records() {
        let record = record?;
        let (Some(email), Some(password)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if email.is_empty() {
            continue;
        }
        users.push(UserRecord {
            email: email.to_string(),
            password: password.to_string(),
        });
    }
    Ok(users)
}
