use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use pv_client::{ApiClient, ClientConfig};
use pv_core::{AppContext, AuthenticatedUser, Role, UserId};
use serde_json::{Value, json};

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const ADMIN_EMAIL: &str = "admin@clinic.org";
pub const ADMIN_PASSWORD: &str = "Adm1n!pass";
pub const NORMAL_EMAIL: &str = "amy@clinic.org";
pub const NORMAL_PASSWORD: &str = "Amy!pass99";
pub const RESET_TOKEN: &str = "valid-reset-token";

/// Shape the fake backend uses for `GET /admin/users`.
#[derive(Clone, Copy, Debug)]
pub enum ListShape {
    Array,
    Users,
    Data,
}

/// Mutable state behind the fake backend
#[derive(Debug)]
pub struct BackendState {
    pub users: Vec<Value>,
    pub next_id: i64,
    pub list_shape: ListShape,
    pub fail_list: bool,
    pub create_delay: Duration,
    /// `METHOD path` of every request received
    pub requests: Vec<String>,
    pub reset_requests: Vec<Value>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            users: vec![
                json!({
                    "uniqueid": 1,
                    "username": "admin",
                    "email": ADMIN_EMAIL,
                    "user_role": "admin",
                    "created_at": "2023-01-01T09:00:00Z",
                    "lastlogged_in": "2024-06-01T10:00:00Z",
                    "login_attempts": 0
                }),
                json!({
                    "uniqueid": 2,
                    "username": "amy",
                    "email": NORMAL_EMAIL,
                    "user_role": "normal",
                    "created_at": "2024-02-01T09:00:00Z",
                    "lastlogged_in": null,
                    "login_attempts": 3
                }),
                json!({
                    "uniqueid": 3,
                    "username": "Bob",
                    "email": "bob@pharma.com",
                    "user_role": "normal",
                    "created_at": "2023-07-15",
                    "lastlogged_in": "2024-05-01T08:30:00Z",
                    "login_attempts": 0
                }),
            ],
            next_id: 4,
            list_shape: ListShape::Users,
            fail_list: false,
            create_delay: Duration::ZERO,
            requests: Vec::new(),
            reset_requests: Vec::new(),
        }
    }
}

pub type SharedState = Arc<Mutex<BackendState>>;

/// In-process stand-in for the signal-detection backend
pub struct FakeBackend {
    pub base_url: String,
    pub state: SharedState,
}

impl FakeBackend {
    pub async fn start() -> Self {
        Self::start_with(BackendState::default()).await
    }

    pub async fn start_with(initial: BackendState) -> Self {
        let state = Arc::new(Mutex::new(initial));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::from_pairs(vec![
            ("PV_API_BASE_URL".to_string(), self.base_url.clone()),
            ("PV_REQUEST_TIMEOUT_SECS".to_string(), "5".to_string()),
        ])
        .expect("Failed to build test config")
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build client")
    }

    pub fn admin_client(&self) -> ApiClient {
        self.client().with_token(ADMIN_TOKEN)
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut BackendState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn requests(&self) -> Vec<String> {
        self.with_state(|s| s.requests.clone())
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }
}

/// Context with a signed-in admin holding the token the fake backend accepts.
pub fn admin_context() -> AppContext {
    let mut ctx = AppContext::default();
    ctx.login(AuthenticatedUser {
        id: UserId::Number(1),
        username: "admin".to_string(),
        role: Role::Admin,
        token: ADMIN_TOKEN.to_string(),
    });
    ctx
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/forget-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/admin/users", get(list_users))
        .route("/admin/createuser", post(create_user))
        .route("/admin/users/{id}", put(update_user).delete(delete_user))
        .route("/admin/users/{id}/unlock", post(unblock_user))
        .with_state(state)
}

fn record(state: &SharedState, line: String) {
    state.lock().unwrap().requests.push(line);
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {ADMIN_TOKEN}").as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
}

fn matches_id(user: &Value, id: &str) -> bool {
    user["uniqueid"].to_string().trim_matches('"') == id
}

async fn login(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /login".to_string());

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let user = match (email, password) {
        (ADMIN_EMAIL, ADMIN_PASSWORD) => {
            json!({ "id": 1, "username": "admin", "user_role": "admin" })
        }
        (NORMAL_EMAIL, NORMAL_PASSWORD) => {
            json!({ "id": 2, "username": "amy", "user_role": "normal" })
        }
        _ => return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response(),
    };

    let token = if user["user_role"] == "admin" {
        ADMIN_TOKEN
    } else {
        "test-normal-token"
    };

    Json(json!({ "token": token, "user": user })).into_response()
}

async fn forgot_password(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /forget-password".to_string());

    let email = body["email"].as_str().unwrap_or_default();
    let known = state
        .lock()
        .unwrap()
        .users
        .iter()
        .any(|u| u["email"] == email);

    if known {
        Json(json!({ "message": "sent" })).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Unknown email").into_response()
    }
}

async fn reset_password(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    record(&state, "POST /reset-password".to_string());
    state.lock().unwrap().reset_requests.push(body.clone());

    if body["token"] == RESET_TOKEN {
        Json(json!({ "message": "reset" })).into_response()
    } else {
        (StatusCode::BAD_REQUEST, "Invalid token").into_response()
    }
}

async fn list_users(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    record(&state, "GET /admin/users".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }

    let guard = state.lock().unwrap();
    if guard.fail_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let users = Value::Array(guard.users.clone());
    let body = match guard.list_shape {
        ListShape::Array => users,
        ListShape::Users => json!({ "users": users }),
        ListShape::Data => json!({ "data": users }),
    };
    Json(body).into_response()
}

async fn create_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST /admin/createuser".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }

    let delay = state.lock().unwrap().create_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut guard = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if guard.users.iter().any(|u| u["email"] == email.as_str()) {
        return (StatusCode::CONFLICT, "Email already exists").into_response();
    }

    let id = guard.next_id;
    guard.next_id += 1;
    let username = email.split('@').next().unwrap_or_default().to_string();
    guard.users.push(json!({
        "uniqueid": id,
        "username": username,
        "email": email,
        "user_role": body["user_role"],
        "created_at": "2024-07-01T00:00:00Z",
        "lastlogged_in": null,
        "login_attempts": 0
    }));

    (StatusCode::CREATED, Json(json!({ "message": "created" }))).into_response()
}

async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, format!("PUT /admin/users/{id} {body}"));
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.lock().unwrap();
    let Some(user) = guard.users.iter_mut().find(|u| matches_id(u, &id)) else {
        return (StatusCode::NOT_FOUND, "User not found").into_response();
    };
    user["username"] = body["username"].clone();
    user["user_role"] = body["user_role"].clone();

    Json(json!({ "message": "updated" })).into_response()
}

async fn unblock_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, format!("POST /admin/users/{id}/unlock"));
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.lock().unwrap();
    let Some(user) = guard.users.iter_mut().find(|u| matches_id(u, &id)) else {
        return (StatusCode::NOT_FOUND, "User not found").into_response();
    };
    user["login_attempts"] = json!(0);

    Json(json!({ "message": "unlocked" })).into_response()
}

async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, format!("DELETE /admin/users/{id}"));
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.lock().unwrap();
    let before = guard.users.len();
    guard.users.retain(|u| !matches_id(u, &id));
    if guard.users.len() == before {
        return (StatusCode::NOT_FOUND, "User not found").into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}
