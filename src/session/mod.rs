//! Login state.
//!
//! The logged-in email lives in a [`Session`] value that protected views
//! check on entry, persisted between invocations by a [`SessionStore`].

mod auth;

pub use auth::{Authenticator, SignupForm, MIN_PASSWORD_LEN};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Who is logged in, if anyone. Sessions do not expire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Email of the logged-in user.
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// A logged-in session for `email`.
    #[must_use]
    pub fn logged_in(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
        }
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.email.is_some()
    }

    /// The logged-in email, or [`Error::NotLoggedIn`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when nobody is logged in.
    pub fn require_login(&self) -> Result<&str> {
        self.email.as_deref().ok_or(Error::NotLoggedIn)
    }

    /// Mark `email` as logged in.
    pub fn login(&mut self, email: &str) {
        self.email = Some(email.to_string());
    }

    /// Forget the logged-in user.
    pub fn logout(&mut self) {
        self.email = None;
    }
}

/// Persistence for a [`Session`].
pub trait SessionStore {
    /// Load the stored session. Anything unreadable is a logged-out session.
    fn load(&self) -> Session;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save(&self, session: &Session) -> Result<()>;
}

/// Session stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/radarix/session.json`, if the platform has a data dir.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|d| Self::new(d.join("radarix").join("session.json")))
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "cannot read session");
                }
                return Session::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "corrupt session file, logging out"
            );
            Session::default()
        })
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        tracing::debug!(
            path = %self.path.display(),
            logged_in = session.is_logged_in(),
            "session saved"
        );
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
}

impl MemorySessionStore {
    /// Start from `session`.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        match self.session.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        match self.session.lock() {
            Ok(mut s) => *s = session.clone(),
            Err(poisoned) => *poisoned.into_inner() = session.clone(),
        }
        Ok(())
    }
}
