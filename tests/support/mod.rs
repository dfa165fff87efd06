#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{get, post},
};
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn sql(&self) -> String {
        let value: serde_json::Value =
            serde_json::from_slice(&self.body).expect("sql body was not JSON");
        value["sql"]
            .as_str()
            .expect("sql body missing `sql` string")
            .to_string()
    }
}

/// How the mock answers. SQL statuses are consumed per call; once drained
/// the last one repeats. `sql_delay` holds back the first SQL call only.
#[derive(Debug, Clone)]
pub struct Script {
    pub sql_statuses: Vec<u16>,
    pub sql_delay: Option<Duration>,
    pub probe_status: u16,
    pub probe_delay: Option<Duration>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            sql_statuses: vec![200],
            sql_delay: None,
            probe_status: 200,
            probe_delay: None,
        }
    }
}

#[derive(Clone)]
struct MockState {
    sql_statuses: Arc<Mutex<VecDeque<u16>>>,
    last_sql_status: Arc<Mutex<u16>>,
    sql_calls: Arc<AtomicUsize>,
    sql_delay: Option<Duration>,
    probe_status: u16,
    probe_delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    fn record(&self, method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(RecordedRequest {
                method,
                path: uri.path().to_string(),
                query: uri.query().map(str::to_string),
                headers,
                body,
            });
    }

    fn next_sql_status(&self) -> u16 {
        let mut queue = self.sql_statuses.lock().expect("status queue poisoned");
        let mut last = self.last_sql_status.lock().expect("status poisoned");
        if let Some(next) = queue.pop_front() {
            *last = next;
        }
        *last
    }
}

pub struct MockBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start(script: Script) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let first = script.sql_statuses.first().copied().unwrap_or(200);
        let state = MockState {
            sql_statuses: Arc::new(Mutex::new(script.sql_statuses.into_iter().collect())),
            last_sql_status: Arc::new(Mutex::new(first)),
            sql_calls: Arc::new(AtomicUsize::new(0)),
            sql_delay: script.sql_delay,
            probe_status: script.probe_status,
            probe_delay: script.probe_delay,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/functions/v1/sql", post(sql_handler))
            .route("/rest/v1/events", get(events_handler))
            .fallback(fallback_handler)
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().expect("mock backend has no address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            task,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    pub fn sql_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/functions/v1/sql")
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn sql_handler(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    state.record(Method::POST, &uri, headers, body);
    let call = state.sql_calls.fetch_add(1, Ordering::SeqCst);
    if let (0, Some(delay)) = (call, state.sql_delay) {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(state.next_sql_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = if status.is_success() {
        "[]".to_string()
    } else {
        format!(r#"{{"message":"mock failure {}"}}"#, status.as_u16())
    };
    (status, body)
}

async fn events_handler(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.record(Method::GET, &uri, headers, Bytes::new());
    if let Some(delay) = state.probe_delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(state.probe_status).unwrap_or(StatusCode::OK);
    (status, r#"{"id":"00000000-0000-0000-0000-000000000000"}"#.to_string())
}

async fn fallback_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    state.record(method, &uri, headers, body);
    StatusCode::NOT_FOUND
}
