//! Raw API Port - Object-safe HTTP boundary
//!
//! Application code describes a call as an [`ApiRequest`] (method, fixed path,
//! query pairs, optional body) and gets back the response body parsed as JSON,
//! verbatim. Interpreting the shape is the caller's job; the typed wrapper in
//! `application::api` does that for every backend endpoint.
//!
//! The trait has a single method so it stays object-safe and trivially
//! mockable; the composition root stores it as `Arc<dyn RawApiPort>`.

use async_trait::async_trait;
use serde_json::Value;

use super::ApiError;

/// HTTP verbs the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request body encodings
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// `application/json`
    Json(Value),
    /// `application/x-www-form-urlencoded`, fields in order
    Form(Vec<(String, String)>),
}

/// One call against the backend, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(RequestBody::Json(body))
    }

    pub fn put_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(RequestBody::Json(body))
    }

    pub fn post_form(path: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self::new(HttpMethod::Post, path).with_body(RequestBody::Form(fields))
    }

    /// Append a query parameter. Empty values are kept, never dropped.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RawApiPort: Send + Sync {
    /// Execute a request and return the response body parsed as JSON.
    ///
    /// Implementations attach the session's bearer token when one is stored,
    /// enforce the request timeout, and normalize every failure into
    /// [`ApiError`]. They never retry.
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
