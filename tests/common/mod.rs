//! In-process stub backend for integration tests.
//!
//! An `axum` router whose fallback answers from a table of canned routes and
//! records every request it sees.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as the stub received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A canned response for one method and path.
#[derive(Debug, Clone)]
pub struct Route {
    method: &'static str,
    path: String,
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Option<Duration>,
    once: bool,
}

impl Route {
    /// Remove the route after it answered once.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Wait before answering.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.eq_ignore_ascii_case(method.as_str()) && self.path == path
    }
}

impl IntoResponse for Route {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// A JSON route.
pub fn json(method: &'static str, path: &str, status: u16, body: Value) -> Route {
    Route {
        method,
        path: path.to_string(),
        status,
        content_type: "application/json",
        body: body.to_string(),
        delay: None,
        once: false,
    }
}

/// A plain-text route.
pub fn text(method: &'static str, path: &str, status: u16, body: &str) -> Route {
    Route {
        method,
        path: path.to_string(),
        status,
        content_type: "text/plain",
        body: body.to_string(),
        delay: None,
        once: false,
    }
}

struct StubState {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct StubServer {
    base: String,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(StubState {
            routes: Mutex::new(routes),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(answer).with_state(Arc::clone(&state));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base,
            state,
            handle,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn last(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Base URL of a port nobody listens on.
pub fn dead_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn answer(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect(),
        body: body.to_vec(),
    });

    let route = {
        let mut routes = state.routes.lock().unwrap();
        match routes.iter().position(|r| r.matches(&method, &path)) {
            Some(i) if routes[i].once => Some(routes.remove(i)),
            Some(i) => Some(routes[i].clone()),
            None => None,
        }
    };
    let Some(route) = route else {
        return json("GET", &path, 404, serde_json::json!({"error": "not found"})).into_response();
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }
    route.into_response()
}
