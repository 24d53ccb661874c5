//! API Errors
//!
//! Every failure the UI can see is a failed request.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, DNS).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("could not encode request: {0}")]
    Encode(String),

    /// A browser API (storage, files, downloads) was unavailable or failed.
    #[error("browser error: {0}")]
    Browser(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Text for a toast. Prefers what the backend said over the status line.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { status, body } => {
                backend_message(body).unwrap_or_else(|| format!("Request failed ({})", status))
            }
            ApiError::Network(_) => "Cannot reach the server".to_string(),
            other => other.to_string(),
        }
    }

    /// First validation message the backend attached to `field`
    pub fn field_error(&self, field: &str) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        let value: Value = serde_json::from_str(body).ok()?;
        first_text(value.get(field)?)
    }
}

/// `{"error": ..}`, `{"message": ..}` and `{"detail": ..}` are the backend's
/// free-form shapes; a field-keyed validation map falls back to its first entry.
fn backend_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    for key in ["error", "message", "detail", "non_field_errors"] {
        if let Some(text) = object.get(key).and_then(first_text) {
            return Some(text);
        }
    }
    object.values().find_map(first_text)
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
