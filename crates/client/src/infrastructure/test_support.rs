//! Stub CropWise backend for HTTP contract tests
//!
//! An axum router bound to `127.0.0.1:0` that mimics the backend's routes
//! closely enough to exercise the adapter, plus a few failure routes
//! (`/fail/*`, `/slow`, `/not-json`). Every request is recorded (method, path,
//! raw query, auth and content-type headers, body) before it is handled.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use cropwise_domain::Credentials;

pub(crate) const GOOD_TOKEN: &str = "good-token";
pub(crate) const ADMIN_TOKEN: &str = "admin-token";
pub(crate) const EXPIRED_TOKEN: &str = "expired-token";

/// Slow routes take this long to answer
pub(crate) const SLOW_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
pub(crate) struct RequestLog {
    inner: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RequestLog {
    pub fn all(&self) -> Vec<RecordedRequest> {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<RecordedRequest> {
        self.all().pop()
    }

    pub fn count(&self) -> usize {
        self.all().len()
    }

    fn push(&self, request: RecordedRequest) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.push(request);
        }
    }
}

pub(crate) struct StubBackend {
    pub addr: SocketAddr,
    pub log: RequestLog,
    _handle: tokio::task::JoinHandle<()>,
}

impl StubBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub(crate) async fn spawn_stub_backend() -> StubBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    let log = RequestLog::default();

    let router = Router::new()
        .route("/", get(health))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/me", get(me))
        .route("/states", get(states))
        .route("/geocode", get(geocode))
        .route("/season_now", get(season_now))
        .route("/live_crops", get(live_crops))
        .route("/analytics/event", post(analytics_event))
        .route("/admin/crop_rules", get(list_rules).post(create_rule))
        .route("/admin/crop_rules/{id}", put(update_rule).delete(delete_rule))
        .route("/fail/empty", get(fail_empty))
        .route("/fail/text", get(fail_text))
        .route("/slow", get(slow))
        .route("/not-json", get(not_json))
        .layer(middleware::from_fn_with_state(log.clone(), record));

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    StubBackend {
        addr,
        log,
        _handle: handle,
    }
}

/// An address nothing listens on
pub(crate) async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}", addr)
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let header_str = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    log.push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn health() -> Response {
    Json(json!({"status": "ok", "service": "CropWise API (dynamic)"})).into_response()
}

async fn signup(Json(creds): Json<Credentials>) -> Response {
    if creds.username == "taken" {
        return detail(StatusCode::BAD_REQUEST, "Username already exists");
    }
    Json(json!({"access_token": format!("signup-{}", creds.username), "token_type": "bearer"}))
        .into_response()
}

async fn login(Form(creds): Form<Credentials>) -> Response {
    if creds.password != "secret" {
        return detail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    Json(json!({"access_token": GOOD_TOKEN, "token_type": "bearer"})).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        None => detail(StatusCode::UNAUTHORIZED, "Not authenticated"),
        Some(EXPIRED_TOKEN) => detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"),
        Some(token) => Json(json!({
            "id": 1,
            "username": "ravi",
            "is_admin": token == ADMIN_TOKEN,
        }))
        .into_response(),
    }
}

async fn states() -> Response {
    Json(json!([
        {"name": "Guntur, Andhra Pradesh, IN", "lat": 16.3, "lon": 80.45, "hits": 4},
        {"name": "Pune, Maharashtra, IN", "lat": 18.52, "lon": 73.86, "hits": 1},
    ]))
    .into_response()
}

async fn geocode(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = params.get("query").cloned().unwrap_or_default();
    let name = match query.strip_prefix("slow ") {
        Some(rest) => {
            tokio::time::sleep(SLOW_DELAY).await;
            rest.to_string()
        }
        None => query,
    };
    Json(json!([
        {"name": format!("{}, Andhra Pradesh, IN", name), "lat": 16.3, "lon": 80.45},
        {"name": format!("{}, Telangana, IN", name), "lat": 17.0, "lon": 79.6},
    ]))
    .into_response()
}

async fn season_now(Query(params): Query<HashMap<String, String>>) -> Response {
    let state = params.get("state").cloned().unwrap_or_default();
    Json(json!({
        "state": format!("{}, IN", state),
        "lat": 16.3,
        "lon": 80.45,
        "month": 7,
        "season": "Kharif",
        "metrics": {"avg_temp_c": 29.4, "total_rain_mm": 61.0},
    }))
    .into_response()
}

async fn live_crops(Query(params): Query<HashMap<String, String>>) -> Response {
    let state = params.get("state").cloned().unwrap_or_default();
    let season = params.get("season").cloned().unwrap_or_default();
    let crops = if season == "Kharif" {
        json!([{
            "crop": "Cotton", "season": "Kharif", "avg_temp_c": 29.4, "total_rain_mm": 61.0,
            "score": 100.0, "tag": "Excellent",
            "rule": {"temp_min": 21.0, "temp_max": 30.0, "rain_min": 50.0, "rain_max": 150.0}
        }])
    } else {
        json!([])
    };
    Json(json!({
        "state": format!("{}, IN", state),
        "lat": 16.3,
        "lon": 80.45,
        "season": season,
        "metrics": {"avg_temp_c": 29.4, "total_rain_mm": 61.0},
        "crops": crops,
    }))
    .into_response()
}

async fn analytics_event(Json(_event): Json<Value>) -> Response {
    Json(json!({"ok": true, "id": 7})).into_response()
}

fn require_admin(headers: &HeaderMap) -> Option<Response> {
    match bearer(headers) {
        Some(ADMIN_TOKEN) => None,
        Some(_) => Some(detail(StatusCode::FORBIDDEN, "Admin access required")),
        None => Some(detail(StatusCode::UNAUTHORIZED, "Not authenticated")),
    }
}

fn rule_json(id: i64, input: &Value) -> Value {
    let mut rule = input.clone();
    if let Some(obj) = rule.as_object_mut() {
        obj.insert("id".to_string(), json!(id));
        obj.entry("active").or_insert(json!(true));
        obj.insert("created_at".to_string(), json!("2025-06-01T08:30:00.123456"));
    }
    rule
}

async fn list_rules(headers: HeaderMap) -> Response {
    if let Some(denied) = require_admin(&headers) {
        return denied;
    }
    Json(json!([rule_json(
        1,
        &json!({"name": "Rice", "seasons": ["Kharif"], "temp_min": 20.0, "temp_max": 35.0,
                "rain_min": 50.0, "rain_max": 300.0, "active": true})
    )]))
    .into_response()
}

async fn create_rule(headers: HeaderMap, Json(input): Json<Value>) -> Response {
    if let Some(denied) = require_admin(&headers) {
        return denied;
    }
    Json(rule_json(8, &input)).into_response()
}

async fn update_rule(headers: HeaderMap, Path(id): Path<i64>, Json(input): Json<Value>) -> Response {
    if let Some(denied) = require_admin(&headers) {
        return denied;
    }
    if id == 999 {
        return detail(StatusCode::NOT_FOUND, "Rule not found");
    }
    Json(rule_json(id, &input)).into_response()
}

async fn delete_rule(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Some(denied) = require_admin(&headers) {
        return denied;
    }
    if id == 999 {
        return detail(StatusCode::NOT_FOUND, "Rule not found");
    }
    Json(json!({"ok": true})).into_response()
}

async fn fail_empty() -> Response {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn fail_text() -> Response {
    (StatusCode::IM_A_TEAPOT, "I am a teapot").into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({})).into_response()
}

async fn not_json() -> Response {
    (StatusCode::OK, "plain text").into_response()
}
