//! Transport wrapper and response validator.
//!
//! # Design
//! `ApiClient` holds the base URL, a `Transport` and the injected `AuthStore`.
//! `fetch_with_credential` only joins the base URL and forwards the request;
//! it never looks at the status. `check_status` is the pure classification of
//! a response, and `ensure_ok` layers the session side effect on top of it:
//! a 401 clears the auth store before the error reaches the caller.
//!
//! The resource operations themselves live in `crate::api`.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpRequest, HttpResponse, RequestInit};
use crate::store::AuthStore;
use crate::transport::{Transport, UreqTransport};

/// Client for the todo API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    base_url: String,
    transport: T,
    auth: AuthStore,
}

impl ApiClient<UreqTransport> {
    pub fn new(config: &ClientConfig, auth: AuthStore) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(), auth)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base_url: &str, transport: T, auth: AuthStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_store(&self) -> &AuthStore {
        &self.auth
    }

    /// Sends `init` to `path` under the base URL with the session credential.
    ///
    /// Returns the raw response whatever its status. Only a network failure
    /// is an error here.
    pub fn fetch_with_credential(
        &self,
        path: &str,
        init: RequestInit,
    ) -> Result<HttpResponse, ApiError> {
        let RequestInit {
            method,
            headers,
            body,
        } = init;
        let request = HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        };
        debug!(%method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, %method, path, "received response");
        Ok(response)
    }

    /// Validates `response`, clearing the auth store on 401.
    pub fn ensure_ok(&self, response: &HttpResponse, message: &str) -> Result<(), ApiError> {
        let result = check_status(response, message);
        if matches!(result, Err(ApiError::SessionExpired)) {
            warn!("session expired, clearing auth store");
            self.auth.clear();
        }
        result
    }

    /// Sends, validates and decodes the JSON body as `R`.
    pub(crate) fn call<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        message: &str,
    ) -> Result<R, ApiError> {
        let response = self.fetch_with_credential(&request.path, request.init)?;
        self.ensure_ok(&response, message)?;
        decode(&response)
    }

    /// Sends and validates, ignoring the body.
    pub(crate) fn call_empty(&self, request: ApiRequest, message: &str) -> Result<(), ApiError> {
        let response = self.fetch_with_credential(&request.path, request.init)?;
        self.ensure_ok(&response, message)
    }
}

/// Map a response status to `Ok` or the matching `ApiError`.
///
/// 401 is `SessionExpired`; any other status outside 200..=299 is
/// `RequestFailed` carrying `message` verbatim.
pub fn check_status(response: &HttpResponse, message: &str) -> Result<(), ApiError> {
    if response.status == 401 {
        return Err(ApiError::SessionExpired);
    }
    if !response.is_success() {
        return Err(ApiError::RequestFailed(message.to_string()));
    }
    Ok(())
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
