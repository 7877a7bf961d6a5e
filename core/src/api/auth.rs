//! `/me`, `/login` and `/logout`.
//!
//! These requests carry no explicit content-type header.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpMethod, RequestInit};
use crate::transport::Transport;
use crate::types::{LoginRequest, User};

pub const GET_ME_FAILED: &str = "failed to get me";
pub const LOGIN_FAILED: &str = "failed to login";
pub const LOGOUT_FAILED: &str = "failed to logout";

pub fn build_get_me() -> ApiRequest {
    ApiRequest::new("/me", RequestInit::new(HttpMethod::Get))
}

pub fn build_login(username: &str, password: &str) -> Result<ApiRequest, ApiError> {
    let init = RequestInit::new(HttpMethod::Post).json_body(&LoginRequest { username, password })?;
    Ok(ApiRequest::new("/login", init))
}

pub fn build_logout() -> ApiRequest {
    ApiRequest::new("/logout", RequestInit::new(HttpMethod::Post))
}

impl<T: Transport> ApiClient<T> {
    /// Fetches the user behind the current session cookie.
    pub fn get_me(&self) -> Result<User, ApiError> {
        self.call(build_get_me(), GET_ME_FAILED)
    }

    /// Logs in. The server answers with the user and sets the session cookie.
    ///
    /// Does not touch the auth store; see `sign_in` for that.
    pub fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.call(build_login(username, password)?, LOGIN_FAILED)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.call_empty(build_logout(), LOGOUT_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_get_me_has_no_headers() {
        let req = build_get_me();
        assert_eq!(req.path, "/me");
        assert_eq!(req.init.method, HttpMethod::Get);
        assert!(req.init.headers.is_empty());
        assert!(req.init.body.is_none());
    }

    #[test]
    fn build_login_sends_credentials_without_content_type() {
        let req = build_login("TEST_USERNAME", "TEST_PASSWORD").unwrap();
        assert_eq!(req.path, "/login");
        assert_eq!(req.init.method, HttpMethod::Post);
        assert!(req.init.headers.is_empty());
        let body: serde_json::Value =
            serde_json::from_str(req.init.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"username": "TEST_USERNAME", "password": "TEST_PASSWORD"})
        );
    }

    #[test]
    fn build_logout_is_bodyless_post() {
        let req = build_logout();
        assert_eq!(req.path, "/logout");
        assert_eq!(req.init.method, HttpMethod::Post);
        assert!(req.init.body.is_none());
        assert!(req.init.headers.is_empty());
    }
}
