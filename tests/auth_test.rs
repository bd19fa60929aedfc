//! Login and signup against a stub credential backend.

#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use common::{dead_base, json, text, StubServer};
use radarix::client::CredentialsClient;
use radarix::session::{Authenticator, FileSessionStore, Session, SessionStore, SignupForm};
use radarix::Error;
use serde_json::json as j;

const USERS: &str = "email,password\nadmin@gpp.com,123456\nbob@example.com,hunter22\n";

fn auth(base: &str) -> Authenticator {
    Authenticator::new(CredentialsClient::new(base, Duration::from_secs(5)).unwrap())
}

fn form(email: &str, password: &str, confirm: &str) -> SignupForm {
    SignupForm {
        email: email.to_string(),
        password: password.to_string(),
        confirm: confirm.to_string(),
    }
}

#[tokio::test]
async fn test_login_exact_match() {
    let server = StubServer::start(vec![text("GET", "/get-users", 200, USERS)]).await;
    let auth = auth(server.base());

    let mut session = Session::default();
    auth.login(&mut session, "  admin@gpp.com ", "123456").await.unwrap();
    assert_eq!(session.email.as_deref(), Some("admin@gpp.com"));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let server = StubServer::start(vec![text("GET", "/get-users", 200, USERS)]).await;
    let auth = auth(server.base());

    let mut session = Session::default();
    let err = auth.login(&mut session, "admin@gpp.com", "1234567").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
    assert_eq!(err.to_string(), "Invalid login details");
    assert!(!session.is_logged_in());

    // Passwords are compared as typed.
    let err = auth.login(&mut session, "bob@example.com", " hunter22").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
}

#[tokio::test]
async fn test_login_backend_down() {
    let mut session = Session::default();
    let err = auth(&dead_base()).login(&mut session, "a@b.c", "secret").await.unwrap_err();
    assert!(err.is_connection());
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_login_persists_through_store() {
    let server = StubServer::start(vec![text("GET", "/get-users", 200, USERS)]).await;
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));

    let mut session = store.load();
    auth(server.base()).login(&mut session, "bob@example.com", "hunter22").await.unwrap();
    store.save(&session).unwrap();

    assert_eq!(store.load().require_login().unwrap(), "bob@example.com");
}

#[tokio::test]
async fn test_signup_success() {
    let server = StubServer::start(vec![json(
        "POST",
        "/add-user",
        200,
        j!({"success": true}),
    )])
    .await;

    auth(server.base()).signup(&form("new@x.io", "secret1", "secret1")).await.unwrap();

    let body = server.last("/add-user").unwrap().body_json();
    assert_eq!(body, j!({"email": "new@x.io", "password": "secret1"}));
}

#[tokio::test]
async fn test_signup_existing_email() {
    let server = StubServer::start(vec![json(
        "POST",
        "/add-user",
        400,
        j!({"success": false, "message": "Email already exists."}),
    )])
    .await;

    let err = auth(server.base())
        .signup(&form("admin@gpp.com", "secret1", "secret1"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Could not create account.");
}

#[tokio::test]
async fn test_signup_backend_down() {
    let err = auth(&dead_base()).signup(&form("a@b.c", "secret1", "secret1")).await.unwrap_err();
    assert_eq!(err.to_string(), "Could not create account.");
}

#[tokio::test]
async fn test_signup_validation_happens_before_request() {
    let server = StubServer::start(vec![json(
        "POST",
        "/add-user",
        200,
        j!({"success": true}),
    )])
    .await;
    let auth = auth(server.base());

    let err = auth.signup(&form("a@b.c", "12345", "12345")).await.unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 6 characters.");
    let err = auth.signup(&form("a@b.c", "123456", "654321")).await.unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match.");
    assert_eq!(server.hits("/add-user"), 0);
}
