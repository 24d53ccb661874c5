//! Mock Transport
//!
//! Records every request and answers from a routing closure.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiClient, ApiError, ApiRequest, ApiResponse, MemoryStore, Method, Transport};

pub const BASE: &str = "http://api/";

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync;

#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn client(&self, base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(self.clone()), Arc::new(MemoryStore::default()))
    }

    /// Client rooted at [`BASE`]
    pub fn default_client(&self) -> ApiClient {
        self.client(BASE)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Requests as `(method, path?query)` relative to [`BASE`]
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, path_of(&r).to_string()))
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = (self.handler)(&request);
        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }
        response
    }
}

pub fn path_of(request: &ApiRequest) -> &str {
    request.url.strip_prefix(BASE).unwrap_or(&request.url)
}

pub fn json_response(status: u16, body: Value) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse {
        status,
        body: serde_json::to_vec(&body).unwrap_or_default(),
    })
}

pub fn empty_response(status: u16) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse { status, body: Vec::new() })
}
