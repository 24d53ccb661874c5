//! Account Endpoints
//!
//! Profile, registration and password flows under `auth/`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiClient, ApiError, ApiResponse};
use crate::models::{Role, User};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// The backend's `{"message": ..}` acknowledgement, or `fallback`
pub fn server_message(response: &ApiResponse, fallback: &str) -> String {
    response
        .json::<Option<MessageBody>>()
        .ok()
        .flatten()
        .and_then(|b| b.message)
        .unwrap_or_else(|| fallback.to_string())
}

/// Client-side check before a new password is submitted
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters");
    }
    if password != confirm {
        return Err("Passwords do not match");
    }
    Ok(())
}

pub async fn fetch_me(client: &ApiClient) -> Result<User, ApiError> {
    client.get("auth/me/", &[]).await
}

/// Partial profile update; returns the saved profile.
pub async fn update_me(client: &ApiClient, fields: &Map<String, Value>) -> Result<User, ApiError> {
    client.put("auth/me/", fields).await?.json()
}

pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<(), ApiError> {
    client.post("auth/register/", request).await?;
    Ok(())
}

pub async fn change_password(client: &ApiClient, old: &str, new: &str) -> Result<String, ApiError> {
    let body = serde_json::json!({ "old_password": old, "new_password": new });
    let response = client.put("auth/change-password/", &body).await?;
    Ok(server_message(&response, "Password changed"))
}

pub async fn request_password_reset(client: &ApiClient, email: &str) -> Result<String, ApiError> {
    let body = serde_json::json!({ "email": email });
    let response = client.post("auth/password-reset/", &body).await?;
    Ok(server_message(&response, "Reset link sent"))
}

pub async fn confirm_password_reset(
    client: &ApiClient,
    uid: &str,
    token: &str,
    new_password: &str,
) -> Result<String, ApiError> {
    let body = serde_json::json!({ "uid": uid, "token": token, "new_password": new_password });
    let response = client.post("auth/password-reset-confirm/", &body).await?;
    Ok(server_message(&response, "Password has been reset"))
}

#[cfg(test)]
mod tests {
    use super::super::mock::{json_response, MockTransport};
    use super::super::{Method, RequestBody};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_new_password() {
        assert_eq!(check_new_password("12345", "12345"), Err("Password must be at least 6 characters"));
        assert_eq!(check_new_password("123456", "123457"), Err("Passwords do not match"));
        assert_eq!(check_new_password("123456", "123456"), Ok(()));
    }

    #[tokio::test]
    async fn test_reset_confirm_payload_and_message() {
        let mock = MockTransport::new(|_| json_response(200, json!({"message": "Done"})));
        let client = mock.default_client();

        let message = confirm_password_reset(&client, "MQ", "abc-123", "newpass").await.unwrap();
        assert_eq!(message, "Done");

        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.body,
            RequestBody::Json(json!({"uid": "MQ", "token": "abc-123", "new_password": "newpass"}))
        );
    }

    #[tokio::test]
    async fn test_change_password_surfaces_old_password_error() {
        let mock = MockTransport::new(|_| {
            json_response(400, json!({"old_password": ["Old password is incorrect."]}))
        });
        let client = mock.default_client();

        let err = change_password(&client, "wrong", "newpass").await.unwrap_err();
        assert_eq!(err.field_error("old_password").as_deref(), Some("Old password is incorrect."));
        assert_eq!(mock.calls(), vec![(Method::Put, "auth/change-password/".to_string())]);
    }

    #[test]
    fn test_register_omits_missing_role() {
        let request = RegisterRequest {
            username: "bob".into(),
            email: "bob@example.com".into(),
            password: "secret1".into(),
            role: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("role").is_none());
    }
}
