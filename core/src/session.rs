//! Login, logout and session restore, mirrored into the auth store.
//!
//! The raw `login`/`logout`/`get_me` operations never write the store
//! themselves (only a 401 clears it). These helpers are the flows a UI runs
//! on top of them.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::User;

impl<T: Transport> ApiClient<T> {
    /// Checks the server session and stores the user it belongs to.
    ///
    /// Returns `Ok(None)` when the session is gone; the store is already
    /// cleared in that case.
    pub fn restore_session(&self) -> Result<Option<User>, ApiError> {
        match self.get_me() {
            Ok(user) => {
                self.auth_store().set(Some(user.clone()));
                Ok(Some(user))
            }
            Err(ApiError::SessionExpired) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Logs in and stores the returned user.
    ///
    /// An empty username or password fails with `MissingCredentials` before
    /// any request is sent.
    pub fn sign_in(&self, username: &str, password: &str) -> Result<User, ApiError> {
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        let user = self.login(username, password)?;
        info!(user_id = %user.id, "signed in");
        self.auth_store().set(Some(user.clone()));
        Ok(user)
    }

    /// Logs out on the server, then clears the store.
    pub fn sign_out(&self) -> Result<(), ApiError> {
        self.logout()?;
        self.auth_store().clear();
        info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::store::AuthStore;

    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<(u16, &'static str)>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: &[(u16, &'static str)]) -> Self {
            Self {
                responses: RefCell::new(responses.iter().copied().collect()),
                ..Self::default()
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            let (status, body) = self
                .responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| TransportError("no scripted response".to_string()))?;
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            })
        }
    }

    const USER: &str = r#"{"id":"TEST_ID","username":"TEST_USERNAME"}"#;

    fn test_user() -> User {
        User {
            id: "TEST_ID".to_string(),
            username: "TEST_USERNAME".to_string(),
        }
    }

    #[test]
    fn sign_in_with_empty_fields_sends_nothing() {
        let transport = ScriptedTransport::new(&[]);
        let client = ApiClient::with_transport("http://api", &transport, AuthStore::new());

        for (username, password) in [("", ""), ("user", ""), ("", "secret")] {
            let err = client.sign_in(username, password).unwrap_err();
            assert!(matches!(err, ApiError::MissingCredentials));
        }
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn sign_in_stores_user() {
        let transport = ScriptedTransport::new(&[(200, USER)]);
        let store = AuthStore::new();
        let client = ApiClient::with_transport("http://api", &transport, store.clone());

        let user = client.sign_in("TEST_USERNAME", "TEST_PASSWORD").unwrap();

        assert_eq!(user, test_user());
        assert_eq!(store.get(), Some(test_user()));
    }

    #[test]
    fn sign_in_with_wrong_password_leaves_store_cleared() {
        let transport = ScriptedTransport::new(&[(401, "")]);
        let store = AuthStore::new();
        let client = ApiClient::with_transport("http://api", &transport, store.clone());

        let err = client.sign_in("TEST_USERNAME", "wrong").unwrap_err();

        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn sign_out_clears_store() {
        let transport = ScriptedTransport::new(&[(204, "")]);
        let store = AuthStore::new();
        store.set(Some(test_user()));
        let seen = std::rc::Rc::new(RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        let subscription = store.subscribe(move |u| sink.borrow_mut().push(u.cloned()));
        let client = ApiClient::with_transport("http://api", &transport, store.clone());

        client.sign_out().unwrap();

        assert_eq!(*seen.borrow(), vec![Some(test_user()), None]);
        subscription.unsubscribe();
    }

    #[test]
    fn sign_out_failure_keeps_user() {
        let transport = ScriptedTransport::new(&[(500, "")]);
        let store = AuthStore::new();
        store.set(Some(test_user()));
        let client = ApiClient::with_transport("http://api", &transport, store.clone());

        let err = client.sign_out().unwrap_err();

        assert!(matches!(err, ApiError::RequestFailed(ref m) if m == "failed to logout"));
        assert!(store.is_logged_in());
    }

    #[test]
    fn restore_session_sets_user() {
        let transport = ScriptedTransport::new(&[(200, USER)]);
        let store = AuthStore::new();
        let client = ApiClient::with_transport("http://api", &transport, store.clone());

        assert_eq!(client.restore_session().unwrap(), Some(test_user()));
        assert_eq!(store.get(), Some(test_user()));
    }

    #[test]
    fn restore_session_without_cookie_is_logged_out() {
        let transport = ScriptedTransport::new(&[(401, "")]);
        let store = AuthStore::new();
        store.set(Some(test_user()));
        let client = ApiClient::with_transport("http://api", &transport, store.clone());

        assert_eq!(client.restore_session().unwrap(), None);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn restore_session_propagates_server_errors() {
        let transport = ScriptedTransport::new(&[(500, "")]);
        let client = ApiClient::with_transport("http://api", &transport, AuthStore::new());

        let err = client.restore_session().unwrap_err();

        assert!(matches!(err, ApiError::RequestFailed(ref m) if m == "failed to get me"));
    }
}
