//! In-memory implementation of the todo API for tests and local development.
//!
//! Sessions are opaque tokens handed out by `/login` in a `token` cookie.
//! Every route except `/login` sits behind `require_session`, which resolves
//! the cookie to a user id or answers 401.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "token";
pub const TEST_USERNAME: &str = "TEST_USERNAME";
pub const TEST_PASSWORD: &str = "TEST_PASSWORD";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub completed: bool,
    pub sort_order: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

/// JSON error body, `{status, code, message}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid request")]
    InvalidRequest,
    #[error("unauthorized, please login again")]
    Unauthorized,
    #[error("not found")]
    NotFound,
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "status": status.as_u16(),
            "code": status.as_u16().to_string(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

struct UserRecord {
    user: User,
    password: String,
}

struct TodoRecord {
    todo: Todo,
    owner: String,
}

struct TaskRecord {
    task: Task,
    todo_id: String,
}

#[derive(Default)]
struct Db {
    users: Vec<UserRecord>,
    sessions: Vec<(String, String)>,
    todos: Vec<TodoRecord>,
    tasks: Vec<TaskRecord>,
}

impl Db {
    fn owns_todo(&self, user_id: &str, todo_id: &str) -> bool {
        self.todos
            .iter()
            .any(|t| t.todo.id == todo_id && t.owner == user_id)
    }
}

/// Shared server state. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct AppState {
    db: Arc<RwLock<Db>>,
}

impl AppState {
    /// State seeded with the `TEST_USERNAME` / `TEST_PASSWORD` account.
    pub fn new() -> Self {
        Self::with_user(TEST_USERNAME, TEST_PASSWORD)
    }

    pub fn with_user(username: &str, password: &str) -> Self {
        let db = Db {
            users: vec![UserRecord {
                user: User {
                    id: Uuid::new_v4().to_string(),
                    username: username.to_string(),
                },
                password: password.to_string(),
            }],
            ..Db::default()
        };
        Self {
            db: Arc::new(RwLock::new(db)),
        }
    }

    /// Registers another account.
    pub async fn add_user(&self, username: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
        };
        self.db.write().await.users.push(UserRecord {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Drops every session, so the next authenticated request gets a 401.
    pub async fn expire_sessions(&self) {
        self.db.write().await.sessions.clear();
    }

    pub async fn session_count(&self) -> usize {
        self.db.read().await.sessions.len()
    }
}

#[derive(Clone)]
struct CurrentUser(String);

pub fn app() -> Router {
    app_with_state(AppState::new())
}

pub fn app_with_state(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(get_me))
        .route("/logout", post(logout))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{todo_id}", get(get_todo))
        .route("/todos/{todo_id}/tasks", get(list_tasks).post(create_task))
        .route(
            "/todos/{todo_id}/tasks/{task_id}",
            patch(update_task).delete(delete_task),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/login", post(login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::new()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let user_id = {
        let token = session_token(request.headers())
            .map(str::to_owned)
            .ok_or(ServerError::Unauthorized)?;
        let db = state.db.read().await;
        db.sessions
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, user_id)| user_id.clone())
            .ok_or(ServerError::Unauthorized)?
    };
    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

// The client sends login without a content-type header, so the body is
// parsed by hand instead of through the `Json` extractor.
async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, ServerError> {
    let input: LoginRequest =
        serde_json::from_slice(&body).map_err(|_| ServerError::InvalidRequest)?;

    let mut db = state.db.write().await;
    let user = db
        .users
        .iter()
        .find(|u| u.user.username == input.username && u.password == input.password)
        .map(|u| u.user.clone())
        .ok_or(ServerError::Unauthorized)?;

    // One live session per user; a new login replaces the previous token.
    let token = Uuid::new_v4().to_string();
    db.sessions.retain(|(_, user_id)| *user_id != user.id);
    db.sessions.push((token.clone(), user.id.clone()));
    tracing::info!(user_id = %user.id, "session created");

    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    let cookie = HeaderValue::from_str(&cookie).map_err(|_| ServerError::InvalidRequest)?;
    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(user)).into_response())
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.db.write().await.sessions.retain(|(t, _)| t != token);
    }
    let expired = HeaderValue::from_static("token=; Path=/; HttpOnly; Max-Age=0");
    (StatusCode::NO_CONTENT, AppendHeaders([(header::SET_COOKIE, expired)]))
}

async fn get_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<User>, ServerError> {
    let db = state.db.read().await;
    db.users
        .iter()
        .find(|u| u.user.id == user_id)
        .map(|u| Json(u.user.clone()))
        .ok_or(ServerError::Unauthorized)
}

async fn list_todos(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Json<Vec<Todo>> {
    let db = state.db.read().await;
    Json(
        db.todos
            .iter()
            .filter(|t| t.owner == user_id)
            .map(|t| t.todo.clone())
            .collect(),
    )
}

async fn create_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        name: input.name,
    };
    state.db.write().await.todos.push(TodoRecord {
        todo: todo.clone(),
        owner: user_id,
    });
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
) -> Result<Json<Todo>, ServerError> {
    let db = state.db.read().await;
    db.todos
        .iter()
        .find(|t| t.todo.id == todo_id && t.owner == user_id)
        .map(|t| Json(t.todo.clone()))
        .ok_or(ServerError::NotFound)
}

async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
) -> Result<Json<Vec<Task>>, ServerError> {
    let db = state.db.read().await;
    if !db.owns_todo(&user_id, &todo_id) {
        return Err(ServerError::NotFound);
    }
    let mut tasks: Vec<Task> = db
        .tasks
        .iter()
        .filter(|t| t.todo_id == todo_id)
        .map(|t| t.task.clone())
        .collect();
    tasks.sort_by_key(|t| t.sort_order);
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(todo_id): Path<String>,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    let mut db = state.db.write().await;
    if !db.owns_todo(&user_id, &todo_id) {
        return Err(ServerError::NotFound);
    }
    let sort_order = db
        .tasks
        .iter()
        .filter(|t| t.todo_id == todo_id)
        .map(|t| t.task.sort_order)
        .max()
        .unwrap_or(0)
        + 1;
    let task = Task {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        due_date: input.due_date,
        completed: input.completed,
        sort_order,
    };
    db.tasks.push(TaskRecord {
        task: task.clone(),
        todo_id,
    });
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path((todo_id, task_id)): Path<(String, String)>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Task>, ServerError> {
    if input.is_empty() {
        return Err(ServerError::InvalidRequest);
    }
    let mut db = state.db.write().await;
    if !db.owns_todo(&user_id, &todo_id) {
        return Err(ServerError::NotFound);
    }
    let record = db
        .tasks
        .iter_mut()
        .find(|t| t.todo_id == todo_id && t.task.id == task_id)
        .ok_or(ServerError::NotFound)?;
    let task = &mut record.task;
    if let Some(name) = input.name {
        task.name = name;
    }
    if let Some(description) = input.description {
        task.description = description;
    }
    if let Some(due_date) = input.due_date {
        task.due_date = due_date;
    }
    if let Some(completed) = input.completed {
        task.completed = completed;
    }
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path((todo_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    let mut db = state.db.write().await;
    if !db.owns_todo(&user_id, &todo_id) {
        return Err(ServerError::NotFound);
    }
    let position = db
        .tasks
        .iter()
        .position(|t| t.todo_id == todo_id && t.task.id == task_id)
        .ok_or(ServerError::NotFound)?;
    db.tasks.remove(position);
    Ok(StatusCode::NO_CONTENT)
}
