//! REST API Client
//!
//! One configured client for the whole app. Every request carries the stored
//! credential; endpoint bindings are organized by domain.

mod auth;
mod credentials;
mod customers;
mod error;
mod http;
mod opportunities;
mod resource;
#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use auth::*;
pub use credentials::{AuthScheme, Credential, CredentialStore, LocalStorageStore, MemoryStore};
pub use customers::*;
pub use error::ApiError;
pub use http::HttpTransport;
pub use opportunities::*;
pub use resource::*;

/// Unreserved characters stay literal in query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

// ========================
// Wire types
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Single-file multipart upload
    File {
        field: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body; an empty body (204) decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let bytes: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
        serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The seam between the client and the network
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

// ========================
// Client
// ========================

#[derive(Clone)]
pub struct ApiClient {
    base: String,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(
        base: &str,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            transport,
            credentials,
        }
    }

    /// Browser client: fetch transport, credential in local storage
    pub fn from_config() -> Self {
        Self::new(
            crate::config::API_BASE,
            Arc::new(HttpTransport::default()),
            Arc::new(LocalStorageStore),
        )
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    pub fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        let mut first = !url.contains('?');
        for (key, value) in query {
            url.push(if first { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&utf8_percent_encode(value, QUERY_VALUE).to_string());
            first = false;
        }
        url
    }

    /// Send a request and fail on any non-2xx status.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody,
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(credential) = self.credentials.load() {
            headers.push(("Authorization".to_string(), credential.header_value()));
        }

        let request = ApiRequest {
            method,
            url: self.url(path, query),
            headers,
            body,
        };
        log::debug!("[API] {:?} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            log::warn!("[API] {:?} {} -> {}", method, path, response.status);
            return Err(ApiError::Status {
                status: response.status,
                body: response.text(),
            });
        }
        Ok(response)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request(Method::Get, path, query, RequestBody::Empty)
            .await?
            .json()
    }

    pub async fn get_raw(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse, ApiError> {
        self.request(Method::Get, path, query, RequestBody::Empty).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.request(Method::Post, path, &[], json_body(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.request(Method::Put, path, &[], json_body(body)?).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError> {
        self.request(Method::Patch, path, &[], json_body(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::Delete, path, &[], RequestBody::Empty).await?;
        Ok(())
    }

    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<ApiResponse, ApiError> {
        let body = RequestBody::File {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        };
        self.request(Method::Post, path, &[], body).await
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::mock::{json_response, MockTransport};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joins_base_path_and_query() {
        let backend = MockTransport::new(|_| json_response(200, json!(null)));
        let client = backend.client("http://127.0.0.1:8000/api/");
        assert_eq!(client.url("customers/", &[]), "http://127.0.0.1:8000/api/customers/");
        assert_eq!(
            client.url("customers/", &[("search", "Nguyễn & co".to_string()), ("page", "2".to_string())]),
            "http://127.0.0.1:8000/api/customers/?search=Nguy%E1%BB%85n%20%26%20co&page=2"
        );
        assert_eq!(
            client.url("opportunities/?page_size=1000", &[("stage", "3".to_string())]),
            "http://127.0.0.1:8000/api/opportunities/?page_size=1000&stage=3"
        );
    }

    #[tokio::test]
    async fn test_credential_attached_to_every_request() {
        let backend = MockTransport::new(|_| json_response(200, json!([])));
        let client = backend.client("http://api/");
        client.credentials().save(&Credential::basic("alice", "pw"));

        let _: serde_json::Value = client.get("customers/", &[]).await.unwrap();
        client.delete("customers/3/").await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(request.header("authorization"), Some("Basic YWxpY2U6cHc="));
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let backend = MockTransport::new(|_| json_response(400, json!({"error": "bad"})));
        let client = backend.client("http://api/");
        let err = client.post("customers/", &json!({"name": ""})).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "bad");
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let response = ApiResponse { status: 204, body: Vec::new() };
        let value: serde_json::Value = response.json().unwrap();
        assert!(value.is_null());
    }
}
