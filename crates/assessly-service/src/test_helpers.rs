use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// How the stub answers `POST /recommend`.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// 200 with the given JSON body.
    Json(Value),
    /// Arbitrary status with a JSON body.
    Status(u16, Value),
    /// 200 with a body that is not JSON.
    Raw(String),
    /// Arbitrary status with a body that is not JSON, e.g. a proxy error page.
    Page(u16, String),
    /// Wait before answering.
    Delayed(Duration, Box<StubReply>),
}

/// One request the stub received.
#[derive(Debug, Clone)]
pub struct Received {
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    received: Arc<Mutex<Vec<Received>>>,
}

/// A running stub recommendation service.
pub struct StubServer {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

pub fn stub_router(reply: StubReply) -> (Router, Arc<Mutex<Vec<Received>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        reply,
        received: received.clone(),
    };
    let router = Router::new()
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .with_state(state);
    (router, received)
}

/// Spawn the stub on a random port. `base_url` looks like
/// "http://127.0.0.1:12345".
pub async fn spawn_stub_server(reply: StubReply) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (app, received) = stub_router(reply);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    StubServer {
        base_url: format!("http://{addr}"),
        received,
        _handle: handle,
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// `n` assessments in the service's wire format, numbered from zero.
pub fn sample_assessments(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "url": format!("https://catalog.example.com/assessment-{i}"),
                "adaptive_support": "No",
                "description": format!("Assessment {i} measures job-relevant skills."),
                "duration": (i as u64 + 1) * 10,
                "remote_support": "Yes",
                "test_type": "Knowledge & Skills"
            })
        })
        .collect();
    json!({ "recommended_assessments": items })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn recommend(State(state): State<StubState>, headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
    state
        .received
        .lock()
        .unwrap()
        .push(Received { content_type, body });

    reply(state.reply).await
}

async fn reply(mut reply: StubReply) -> Response {
    loop {
        match reply {
            StubReply::Json(body) => return Json(body).into_response(),
            StubReply::Status(code, body) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                return (status, Json(body)).into_response();
            }
            StubReply::Raw(text) => {
                return (StatusCode::OK, [(header::CONTENT_TYPE, "text/html")], text).into_response();
            }
            StubReply::Page(code, text) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
                return (status, [(header::CONTENT_TYPE, "text/html")], text).into_response();
            }
            StubReply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
        }
    }
}
