//! Client core for the todo/task tracking API.
//!
//! # Overview
//! A thin API-client layer over plain JSON-over-HTTP with cookie sessions:
//! a transport wrapper that always carries the session credential, a response
//! validator, one typed function per REST operation, and an observable auth
//! store holding the logged-in user.
//!
//! # Design
//! - `ApiClient` owns the base URL, a `Transport` and an injected `AuthStore`.
//!   Nothing here is global; tests build their own store and transport.
//! - Each operation is split into a pure `build_*` function (produces an
//!   `ApiRequest`) and an `ApiClient` method that sends it, validates the
//!   status and decodes the body.
//! - Every call is one round trip. No retries, no caching.
//! - A 401 from any operation clears the auth store before the error is
//!   returned to the caller.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

pub use client::{check_status, ApiClient};
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use http::{ApiRequest, HttpMethod, HttpRequest, HttpResponse, RequestInit};
pub use store::{AuthState, AuthStore, Subscription};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CreateTaskRequest, CreateTodoRequest, PartialUpdateTaskRequest, Task, Todo, User,
};
