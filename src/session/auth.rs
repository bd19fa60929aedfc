//! Login and signup against the credential backend.

use super::Session;
use crate::client::CredentialsClient;
use crate::error::{Error, Result};

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

const MSG_EMPTY: &str = "Please fill out all fields.";
const MSG_SHORT: &str = "Password must be at least 6 characters.";
const MSG_MISMATCH: &str = "Passwords do not match.";
const MSG_SIGNUP_FAILED: &str = "Could not create account.";

/// Signup input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password typed a second time.
    pub confirm: String,
}

impl SignupForm {
    /// Check the form before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the message to show.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::Validation(MSG_EMPTY.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(MSG_SHORT.to_string()));
        }
        if self.password != self.confirm {
            return Err(Error::Validation(MSG_MISMATCH.to_string()));
        }
        Ok(())
    }
}

/// Checks credentials and creates accounts.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: CredentialsClient,
}

impl Authenticator {
    /// Wrap a credential client.
    #[must_use]
    pub fn new(client: CredentialsClient) -> Self {
        Self { client }
    }

    /// Log `email` in if the pair matches a stored user exactly.
    ///
    /// The email is trimmed; the password is compared as typed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCredentials`] on a mismatch, or the transport error
    /// if the credential list cannot be fetched.
    pub async fn login(&self, session: &mut Session, email: &str, password: &str) -> Result<()> {
        let email = email.trim();
        let users = self.client.users().await?;
        if users.iter().any(|u| u.email == email && u.password == password) {
            session.login(email);
            tracing::info!(email, "logged in");
            Ok(())
        } else {
            tracing::info!(email, "rejected login");
            Err(Error::InvalidCredentials)
        }
    }

    /// Validate the form and create the account.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] with the form message, or with
    /// "Could not create account." when the backend refuses or fails.
    pub async fn signup(&self, form: &SignupForm) -> Result<()> {
        form.validate()?;
        let email = form.email.trim();
        match self.client.add_user(email, &form.password).await {
            Ok(resp) if resp.success => {
                tracing::info!(email, "account created");
                Ok(())
            }
            Ok(resp) => {
                let reason = resp.message.as_deref().unwrap_or("");
                tracing::warn!(email, reason, "signup refused");
                Err(Error::Validation(MSG_SIGNUP_FAILED.to_string()))
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "signup failed");
                Err(Error::Validation(MSG_SIGNUP_FAILED.to_string()))
            }
        }
    }
}
