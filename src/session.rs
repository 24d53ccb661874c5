//! Session
//!
//! Login, logout and startup verification of the stored credential.

use crate::api::{fetch_me, ApiClient, ApiError, Credential};
use crate::models::User;

#[derive(Clone)]
pub struct Session {
    client: ApiClient,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn has_stored_credentials(&self) -> bool {
        self.client.credentials().load().is_some()
    }

    /// Store Basic credentials and verify them against the profile endpoint.
    /// A rejected login leaves nothing stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        self.client
            .credentials()
            .save(&Credential::basic(username.trim(), password));
        match fetch_me(&self.client).await {
            Ok(user) => {
                log::info!("[AUTH] logged in as {} ({})", user.username, user.role.as_str());
                Ok(user)
            }
            Err(err) => {
                log::warn!("[AUTH] login rejected for {}: {}", username, err);
                self.client.credentials().clear();
                Err(err)
            }
        }
    }

    /// Verify a credential left over from a previous visit.
    pub async fn restore(&self) -> Option<User> {
        if !self.has_stored_credentials() {
            return None;
        }
        match fetch_me(&self.client).await {
            Ok(user) => {
                log::info!("[AUTH] session restored for {}", user.username);
                Some(user)
            }
            Err(err) => {
                log::warn!("[AUTH] stored credential rejected: {}", err);
                self.client.credentials().clear();
                None
            }
        }
    }

    /// Re-read the profile after an edit; the credential is kept on failure.
    pub async fn refresh(&self) -> Result<User, ApiError> {
        fetch_me(&self.client).await
    }

    pub fn logout(&self) {
        self.client.credentials().clear();
        log::info!("[AUTH] logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{json_response, MockTransport};
    use crate::api::AuthScheme;
    use serde_json::json;

    /// Accepts exactly alice:secret
    fn backend() -> MockTransport {
        MockTransport::new(|req| match req.header("authorization") {
            Some("Basic YWxpY2U6c2VjcmV0") => json_response(
                200,
                json!({"id": 1, "username": "alice", "email": "a@x.io", "role": "MANAGER"}),
            ),
            _ => json_response(401, json!({"detail": "Invalid username/password."})),
        })
    }

    #[tokio::test]
    async fn test_valid_login_creates_session() {
        let session = Session::new(backend().default_client());
        let user = session.login("alice", "secret").await.unwrap();
        assert_eq!(user.username, "alice");

        let stored = session.client().credentials().load().unwrap();
        assert_eq!(stored.scheme, AuthScheme::Basic);
        assert_eq!(stored.token, "YWxpY2U6c2VjcmV0");
    }

    #[tokio::test]
    async fn test_invalid_login_leaves_no_credentials() {
        let session = Session::new(backend().default_client());
        let err = session.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.message(), "Invalid username/password.");
        assert!(!session.has_stored_credentials());
    }

    #[tokio::test]
    async fn test_restore_verifies_stored_credentials() {
        let mock = backend();
        let session = Session::new(mock.default_client());
        assert_eq!(session.restore().await, None);
        assert!(mock.requests().is_empty());

        session.client().credentials().save(&Credential::basic("alice", "secret"));
        assert_eq!(session.restore().await.map(|u| u.id), Some(1));

        session.client().credentials().save(&Credential::basic("alice", "stale"));
        assert_eq!(session.restore().await, None);
        assert!(!session.has_stored_credentials());
    }

    #[tokio::test]
    async fn test_logout_clears_credentials() {
        let session = Session::new(backend().default_client());
        session.login("alice", "secret").await.unwrap();
        session.logout();
        assert!(!session.has_stored_credentials());
    }
}
