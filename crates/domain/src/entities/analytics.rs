//! Analytics events and generic acknowledgements

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Usage signal posted to `/analytics/event`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event_name: String,
    #[serde(default)]
    pub meta: Option<Value>,
}

impl AnalyticsEvent {
    pub fn new(event_name: impl Into<String>, meta: Option<Value>) -> Self {
        Self {
            event_name: event_name.into(),
            meta,
        }
    }
}

/// `{ok, id?}` acknowledgement returned by write endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Backend liveness payload from `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
