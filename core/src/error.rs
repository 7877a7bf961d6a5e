//! Error types for the todo API client.
//!
//! # Design
//! `SessionExpired` gets a dedicated variant because it carries a side effect
//! (the auth store is already cleared when the caller sees it) and the UI is
//! expected to route back to the login view. Every other non-2xx response is
//! `RequestFailed` with a fixed, operation-specific message; the server's
//! error body is never surfaced.

use thiserror::Error;

/// Errors returned by `ApiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401. The auth store has been cleared.
    #[error("session timeout please login again")]
    SessionExpired,

    /// The server returned a non-2xx status other than 401.
    #[error("{0}")]
    RequestFailed(String),

    /// `sign_in` was called with an empty username or password.
    #[error("username and password are required")]
    MissingCredentials,

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// A network-level failure reported by a `Transport`.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);
