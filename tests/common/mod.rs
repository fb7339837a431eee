#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use books_metrics_http::{RetryConfig, RetryEvent, RetryObserver};
use serde_json::{json, Value as JsonValue};

pub const BOOKS_PATH: &str = "/api/v1/books";

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: JsonValue,
    delay: Duration,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body,
            delay: Duration::from_millis(0),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self::json(status, json!({ "error": status.as_u16() }))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    hits: Arc<AtomicUsize>,
}

async fn books_handler(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    (response.status, Json(response.body))
}

pub struct Upstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Upstream {
    pub fn books_url(&self) -> String {
        format!("{}{BOOKS_PATH}", self.base_url)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serves the queued responses, in order, on `GET /api/v1/books`.
pub async fn spawn_upstream(responses: Vec<MockResponse>) -> Upstream {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route(BOOKS_PATH, get(books_handler))
        .with_state(state.clone());

    let (base_url, task) = serve(app).await;
    Upstream {
        base_url,
        hits: state.hits,
        task,
    }
}

/// Binds `app` on an ephemeral local port.
pub async fn serve(app: Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });
    (format!("http://{address}"), task)
}

/// URL on a local port nothing listens on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind a throwaway listener");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);
    format!("http://{address}{BOOKS_PATH}")
}

pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..RetryConfig::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRetry {
    pub attempt: u32,
    pub max_attempts: u32,
    pub status: Option<u16>,
    pub message: String,
    pub delay: Duration,
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RecordedRetry>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<RecordedRetry> {
        self.events
            .lock()
            .expect("observer mutex must not be poisoned")
            .clone()
    }
}

impl RetryObserver for RecordingObserver {
    fn on_retry(&self, event: &RetryEvent<'_>) {
        self.events
            .lock()
            .expect("observer mutex must not be poisoned")
            .push(RecordedRetry {
                attempt: event.attempt,
                max_attempts: event.max_attempts,
                status: event.status,
                message: event.message.to_owned(),
                delay: event.delay,
            });
    }
}

pub fn books_body() -> JsonValue {
    json!([
        { "id": 1, "name": "Book 1", "author": "A", "units_sold": 100, "price": 20 },
        { "id": 2, "name": "Book 2", "author": "B", "units_sold": 200, "price": 15 },
        { "id": 3, "name": "Book 3", "author": "A", "units_sold": 300, "price": 25 }
    ])
}
