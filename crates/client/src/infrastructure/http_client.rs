//! reqwest-backed request executor
//!
//! `ApiAdapter` is the only component that talks HTTP. For every request it:
//!
//! 1. joins the configured base URL with the request's fixed path
//! 2. encodes query pairs and the JSON or form body
//! 3. attaches `Authorization: Bearer <token>` if the session holds a token
//! 4. bounds the whole exchange (send plus body read) by the request timeout
//! 5. maps every failure into [`ApiError`]

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::ports::outbound::{ApiError, ApiRequest, HttpMethod, RawApiPort, RequestBody};
use crate::state::Session;

pub struct ApiAdapter {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: Session,
}

impl ApiAdapter {
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self::with_timeout(&config.api_base_url, config.request_timeout, session)
    }

    /// Create an adapter with an explicit timeout (for testing).
    pub fn with_timeout(base_url: &str, timeout: Duration, session: Session) -> Self {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client, using defaults");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build(&self, request: &ApiRequest) -> RequestBuilder {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(fields) => builder.form(fields),
        };

        // Read at call time so login/logout apply to the very next request.
        if let Some(token) = self.session.token() {
            builder = builder.header(reqwest::header::AUTHORIZATION, token.bearer_header());
        }

        builder
    }

    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let response = self
            .build(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body is treated as empty.
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpStatus {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::network(format!("Invalid JSON response: {}", e)))
    }
}

#[async_trait]
impl RawApiPort for ApiAdapter {
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::debug!(
                method = request.method.as_str(),
                path = %request.path,
                elapsed_ms,
                "Request succeeded"
            ),
            Err(e) => tracing::warn!(
                method = request.method.as_str(),
                path = %request.path,
                status = ?e.status(),
                elapsed_ms,
                error = %e,
                "Request failed"
            ),
        }

        result
    }
}

/// Map a reqwest failure, keeping its source chain as the cause text.
fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }

    let mut cause = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !cause.contains(&text) {
            cause.push_str(": ");
            cause.push_str(&text);
        }
        source = inner.source();
    }
    ApiError::Network { cause: Some(cause) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStorageProvider;
    use crate::infrastructure::test_support::{
        closed_port_url, spawn_stub_backend, GOOD_TOKEN,
    };
    use cropwise_domain::SessionToken;
    use serde_json::json;

    fn adapter(base_url: &str, timeout: Duration) -> (ApiAdapter, Session) {
        let session = Session::new(MemoryStorageProvider::new());
        (
            ApiAdapter::with_timeout(base_url, timeout, session.clone()),
            session,
        )
    }

    #[tokio::test]
    async fn test_success_returns_json_verbatim() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_secs(5));

        let value = api.execute(ApiRequest::get("/")).await.expect("health");
        assert_eq!(
            value,
            json!({"status": "ok", "service": "CropWise API (dynamic)"})
        );
    }

    #[tokio::test]
    async fn test_error_body_is_message_verbatim() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_secs(5));

        let err = api
            .execute(ApiRequest::get("/fail/text"))
            .await
            .expect_err("teapot");
        assert_eq!(
            err,
            ApiError::HttpStatus {
                code: 418,
                body: "I am a teapot".to_string()
            }
        );
        assert_eq!(err.message(), "I am a teapot");
    }

    #[tokio::test]
    async fn test_empty_error_body_reports_status() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_secs(5));

        let err = api
            .execute(ApiRequest::get("/fail/empty"))
            .await
            .expect_err("500");
        assert_eq!(err.message(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_timeout_message() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_millis(100));

        let err = api
            .execute(ApiRequest::get("/slow"))
            .await
            .expect_err("timeout");
        assert_eq!(err, ApiError::Timeout);
        assert_eq!(err.message(), "Request timed out");
    }

    #[tokio::test]
    async fn test_configured_timeout_applies() {
        let stub = spawn_stub_backend().await;
        let config = ClientConfig::default()
            .with_base_url(&stub.base_url())
            .expect("stub url")
            .with_timeout(Duration::from_millis(100));
        let api = ApiAdapter::new(&config, Session::new(MemoryStorageProvider::new()));

        let started = Instant::now();
        let err = api
            .execute(ApiRequest::get("/slow"))
            .await
            .expect_err("timeout");
        assert_eq!(err, ApiError::Timeout);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let url = closed_port_url().await;
        let (api, _) = adapter(&url, Duration::from_secs(5));

        let err = api
            .execute(ApiRequest::get("/states"))
            .await
            .expect_err("refused");
        assert!(matches!(err, ApiError::Network { cause: Some(_) }));
        assert_ne!(err.message(), "Request timed out");
    }

    #[tokio::test]
    async fn test_non_json_success_is_network_error() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_secs(5));

        let err = api
            .execute(ApiRequest::get("/not-json"))
            .await
            .expect_err("not json");
        assert!(err.message().starts_with("Invalid JSON response"));
    }

    #[tokio::test]
    async fn test_bearer_header_only_when_token_present() {
        let stub = spawn_stub_backend().await;
        let (api, session) = adapter(&stub.base_url(), Duration::from_secs(5));

        let err = api.execute(ApiRequest::get("/me")).await.expect_err("401");
        assert!(err.is_unauthorized());
        assert_eq!(stub.log.last().expect("recorded").authorization, None);

        session.login(&SessionToken::new(GOOD_TOKEN).expect("token"));
        api.execute(ApiRequest::get("/me")).await.expect("profile");
        assert_eq!(
            stub.log.last().expect("recorded").authorization.as_deref(),
            Some("Bearer good-token")
        );

        session.logout();
        api.execute(ApiRequest::get("/states")).await.expect("states");
        assert_eq!(stub.log.last().expect("recorded").authorization, None);
    }

    #[tokio::test]
    async fn test_form_and_json_bodies() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_secs(5));

        api.execute(ApiRequest::post_form(
            "/auth/login",
            vec![
                ("username".to_string(), "ravi".to_string()),
                ("password".to_string(), "secret".to_string()),
            ],
        ))
        .await
        .expect("login");
        let login = stub.log.last().expect("recorded");
        assert_eq!(
            login.content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(login.body, "username=ravi&password=secret");

        api.execute(ApiRequest::post_json(
            "/auth/signup",
            json!({"username": "ravi", "password": "pw"}),
        ))
        .await
        .expect("signup");
        let signup = stub.log.last().expect("recorded");
        assert_eq!(signup.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            serde_json::from_str::<Value>(&signup.body).expect("json body"),
            json!({"username": "ravi", "password": "pw"})
        );
    }

    #[tokio::test]
    async fn test_empty_query_value_is_sent() {
        let stub = spawn_stub_backend().await;
        let (api, _) = adapter(&stub.base_url(), Duration::from_secs(5));

        api.execute(
            ApiRequest::get("/live_crops")
                .query("state", "Guntur")
                .query("season", ""),
        )
        .await
        .expect("live crops");
        assert_eq!(
            stub.log.last().expect("recorded").query.as_deref(),
            Some("state=Guntur&season=")
        );
    }

    #[test]
    fn test_url_join() {
        let (api, _) = adapter("http://localhost:8000/", Duration::from_secs(1));
        assert_eq!(api.base_url, "http://localhost:8000");
        assert_eq!(api.url("/states"), "http://localhost:8000/states");
        assert_eq!(api.url("states"), "http://localhost:8000/states");
    }
}
