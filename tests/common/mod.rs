use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

/// One list request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub kind: String,
    pub page: usize,
    pub size: usize,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Default)]
pub struct BackendState {
    requests: Mutex<Vec<SeenRequest>>,
    created: Mutex<Vec<Value>>,
    create_count: AtomicUsize,
    create_attempts: AtomicUsize,
    fail_user_lists: AtomicBool,
    fail_creates: AtomicUsize,
}

/// In-process admin backend bound to an ephemeral port. Serves a small fixed
/// principal directory and captures everything the client sends.
pub struct MockBackend {
    pub base_url: String,
    state: Arc<BackendState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        init_tracing();
        let state = Arc::new(BackendState::default());
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock backend")?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { base_url: format!("http://{}", addr), state, handle })
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, kind: &str) -> Vec<SeenRequest> {
        self.requests().into_iter().filter(|r| r.kind == kind).collect()
    }

    /// Bodies of the successful folder creations, in arrival order.
    pub fn created(&self) -> Vec<Value> {
        self.state.created.lock().unwrap().clone()
    }

    /// How many creation requests arrived, failed ones included.
    pub fn create_attempts(&self) -> usize {
        self.state.create_attempts.load(Ordering::SeqCst)
    }

    /// Make the next folder creation answer 500.
    pub fn fail_next_create(&self) {
        self.state.fail_creates.fetch_add(1, Ordering::SeqCst);
    }

    /// Toggle 500 responses for the user list endpoint.
    pub fn fail_user_lists(&self, fail: bool) {
        self.state.fail_user_lists.store(fail, Ordering::SeqCst);
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/groups", get(list_groups))
        .route("/api/admin/roles", get(list_roles))
        .route("/api/admin/folders", post(create_folder))
        .with_state(state)
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    page: usize,
    #[serde(default = "default_size")]
    size: usize,
    #[serde(default)]
    query: Option<String>,
}

fn default_size() -> usize {
    100
}

fn all_users() -> Vec<Value> {
    vec![
        json!({"id": "u1", "firstName": "Ada", "lastName": "Lovelace", "email": "ada@corp.example", "username": "ada", "createdAt": "2024-03-01T10:00:00Z"}),
        json!({"id": "u2", "firstName": "Grace", "lastName": "Hopper", "email": "grace@corp.example", "username": "ghopper"}),
        json!({"id": "u3", "firstName": "Margaret", "lastName": "Hamilton", "email": "margaret@corp.example", "username": "mhamilton"}),
        json!({"id": "u4", "firstName": "Katherine", "lastName": "Johnson", "email": "katherine@corp.example", "username": "kjohnson"}),
    ]
}

fn all_groups() -> Vec<Value> {
    vec![
        json!({"id": "g1", "name": "Engineering", "path": "/corp/engineering"}),
        json!({"id": "g2", "name": "Legal", "path": "/corp/legal"}),
        json!({"id": "g3", "name": "Finance", "path": "/corp/finance"}),
    ]
}

fn all_roles() -> Vec<Value> {
    vec![
        json!({"id": "r1", "name": "Administrator", "description": "Full console access"}),
        json!({"id": "r2", "name": "Auditor", "description": "Read-only oversight"}),
        json!({"id": "r3", "name": "Librarian", "description": "Manages retention rules"}),
    ]
}

fn entry_matches(entry: &Value, query: &str) -> bool {
    let query = query.to_lowercase();
    entry
        .as_object()
        .map(|map| {
            map.values()
                .filter_map(Value::as_str)
                .any(|value| value.to_lowercase().starts_with(&query))
        })
        .unwrap_or(false)
}

fn serve_list(entries: Vec<Value>, params: &ListParams) -> Vec<Value> {
    match &params.query {
        Some(query) => entries.into_iter().filter(|entry| entry_matches(entry, query)).collect(),
        None => entries.into_iter().take(params.size).collect(),
    }
}

fn record(state: &BackendState, kind: &str, headers: &HeaderMap, params: &ListParams) {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    state.requests.lock().unwrap().push(SeenRequest {
        kind: kind.to_string(),
        page: params.page,
        size: params.size,
        query: params.query.clone(),
        bearer,
    });
}

async fn list_users(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    record(&state, "users", &headers, &params);
    if state.fail_user_lists.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected user list failure").into_response();
    }
    Json(serve_list(all_users(), &params)).into_response()
}

async fn list_groups(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    record(&state, "groups", &headers, &params);
    Json(serve_list(all_groups(), &params)).into_response()
}

async fn list_roles(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    record(&state, "roles", &headers, &params);
    Json(serve_list(all_roles(), &params)).into_response()
}

async fn create_folder(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    state.create_attempts.fetch_add(1, Ordering::SeqCst);
    if state.fail_creates.load(Ordering::SeqCst) > 0 {
        state.fail_creates.fetch_sub(1, Ordering::SeqCst);
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected create failure").into_response();
    }

    let serial = state.create_count.fetch_add(1, Ordering::SeqCst) + 1;
    let name = body.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
    state.created.lock().unwrap().push(body);

    Json(json!({"id": format!("mock-folder-{}", serial), "name": name})).into_response()
}
