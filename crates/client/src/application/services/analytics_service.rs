//! Analytics Service - usage events
//!
//! Analytics never interrupts the user. Failures are logged at `warn` and
//! dropped, and `track` does not even wait for the response.

use serde_json::Value;

use cropwise_domain::{Ack, AnalyticsEvent};

use crate::application::api::CropwiseApi;

#[derive(Clone)]
pub struct AnalyticsService {
    api: CropwiseApi,
}

impl AnalyticsService {
    pub fn new(api: CropwiseApi) -> Self {
        Self { api }
    }

    /// Post an event and wait for the acknowledgement.
    ///
    /// Returns `None` on any failure; the error is only logged.
    pub async fn record(&self, event_name: &str, meta: Option<Value>) -> Option<Ack> {
        let event = AnalyticsEvent::new(event_name, meta);
        match self.api.record_event(&event).await {
            Ok(ack) => {
                tracing::debug!(event = event_name, id = ?ack.id, "Analytics event recorded");
                Some(ack)
            }
            Err(e) => {
                tracing::warn!(event = event_name, error = %e, "Failed to record analytics event");
                None
            }
        }
    }

    /// Post an event in the background without waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn track(&self, event_name: &str, meta: Option<Value>) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        let event_name = event_name.to_string();
        tokio::spawn(async move {
            service.record(&event_name, meta).await;
        })
    }
}
