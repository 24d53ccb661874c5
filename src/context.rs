//! Application Context
//!
//! Session and notification state provided via Leptos Context API.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ApiClient, ApiError};
use crate::config::{ERROR_TOAST_MS, SUCCESS_TOAST_MS};
use crate::models::{Role, User};
use crate::session::Session;

// ========================
// Auth
// ========================

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub user: RwSignal<Option<User>>,
    /// True until the stored credential has been checked
    pub loading: RwSignal<bool>,
    session: StoredValue<Session>,
}

impl AuthContext {
    pub fn new(session: Session) -> Self {
        let loading = session.has_stored_credentials();
        Self {
            user: RwSignal::new(None),
            loading: RwSignal::new(loading),
            session: StoredValue::new(session),
        }
    }

    pub fn session(&self) -> Session {
        self.session.get_value()
    }

    pub fn client(&self) -> ApiClient {
        self.session.with_value(|s| s.client().clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.with(|u| u.as_ref().map(|u| u.role))
    }

    pub fn can_manage(&self) -> bool {
        self.role().is_some_and(|r| r.can_manage())
    }

    /// Check a leftover credential once at startup.
    pub fn restore(self) {
        if !self.loading.get_untracked() {
            return;
        }
        spawn_local(async move {
            let user = self.session().restore().await;
            self.user.set(user);
            self.loading.set(false);
        });
    }

    /// A rejected login leaves no credential behind, so nobody stays signed in.
    pub async fn login(self, username: String, password: String) -> Result<(), ApiError> {
        match self.session().login(&username, &password).await {
            Ok(user) => {
                self.user.set(Some(user));
                Ok(())
            }
            Err(err) => {
                self.user.set(None);
                Err(err)
            }
        }
    }

    pub fn logout(self) {
        self.session.with_value(Session::logout);
        self.user.set(None);
    }

    pub async fn refresh(self) -> Result<(), ApiError> {
        let user = self.session().refresh().await?;
        self.user.set(Some(user));
        Ok(())
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

pub fn use_api() -> ApiClient {
    use_auth().client()
}

// ========================
// Notifications
// ========================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    pub toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    fn push(&self, kind: ToastKind, text: String, millis: u32) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.toasts.update(|t| t.push(Toast { id, kind, text }));

        let toasts = self.toasts;
        Timeout::new(millis, move || {
            let _ = toasts.try_update(|t| t.retain(|toast| toast.id != id));
        })
        .forget();
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(ToastKind::Success, text.into(), SUCCESS_TOAST_MS);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(ToastKind::Error, text.into(), ERROR_TOAST_MS);
    }

    /// Toast the user-facing text of a failed request.
    pub fn api_error(&self, err: &ApiError) {
        log::error!("[API] {}", err);
        self.error(err.message());
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|t| t.retain(|toast| toast.id != id));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notifier() -> Notifier {
    expect_context::<Notifier>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{json_response, MockTransport};
    use serde_json::json;

    fn backend() -> MockTransport {
        MockTransport::new(|req| match req.header("authorization") {
            Some("Basic YWxpY2U6c2VjcmV0") => json_response(
                200,
                json!({"id": 1, "username": "alice", "email": "a@x.io", "role": "REP"}),
            ),
            _ => json_response(401, json!({"detail": "Invalid username/password."})),
        })
    }

    #[tokio::test]
    async fn test_rejected_login_signs_out() {
        let owner = Owner::new();
        owner.set();

        let auth = AuthContext::new(Session::new(backend().default_client()));
        auth.login("alice".into(), "secret".into()).await.unwrap();
        assert_eq!(auth.role(), Some(Role::Rep));

        let err = auth.login("alice".into(), "changed".into()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(auth.user.get_untracked(), None);
        assert!(!auth.session().has_stored_credentials());
    }
}
