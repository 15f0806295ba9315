//! Stub gateway for requester integration tests.
//!
//! An axum server on `127.0.0.1:0` that records every request it receives and
//! answers with a configurable status and body. Tests assert on what reached
//! the wire, and on how many requests did.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use photoscope_core::ApiConfig;
use std::sync::{Arc, Mutex};

/// One request as the stub saw it.
#[derive(Clone, Debug)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
struct StubState {
    captured: Arc<Mutex<Vec<Captured>>>,
    reply: Arc<Mutex<(StatusCode, String)>>,
}

pub struct StubGateway {
    pub base_url: String,
    state: StubState,
}

impl StubGateway {
    /// Start a stub that answers every request with `status` and `body`.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let state = StubState {
            captured: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new((StatusCode::from_u16(status).unwrap(), body.into()))),
        };
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubGateway { base_url: format!("http://{addr}"), state }
    }

    /// Config pointing at `<stub>/dev`, mimicking an API gateway stage.
    pub fn config(&self) -> ApiConfig {
        ApiConfig::from_base(&format!("{}/dev", self.base_url)).unwrap()
    }

    pub fn set_reply(&self, status: u16, body: impl Into<String>) {
        *self.state.reply.lock().unwrap() = (StatusCode::from_u16(status).unwrap(), body.into());
    }

    pub fn hits(&self) -> usize {
        self.state.captured.lock().unwrap().len()
    }

    pub fn last(&self) -> Captured {
        self.state.captured.lock().unwrap().last().cloned().expect("stub received no requests")
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.captured.lock().unwrap().push(Captured {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    let (status, body) = state.reply.lock().unwrap().clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}
