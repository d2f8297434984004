//! Typed API wrapper for application services.
//!
//! `CropwiseApi` wraps an `Arc<dyn RawApiPort>` and exposes one method per
//! backend endpoint, turning domain values into [`ApiRequest`]s and raw JSON
//! bodies back into domain types. It holds no state of its own; the token is
//! attached by whichever adapter sits behind the port.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use cropwise_domain::{
    Ack, AnalyticsEvent, CropRule, CropRuleInput, Credentials, HealthStatus, KnownPlace,
    LiveCropResult, PlaceMatch, Season, SeasonNow, TokenGrant, UserProfile,
};

use crate::application::{ParseResponse, ServiceError};
use crate::ports::outbound::{ApiRequest, RawApiPort};

/// Backend paths, relative to the base URL
pub mod paths {
    pub const HEALTH: &str = "/";
    pub const SIGNUP: &str = "/auth/signup";
    pub const LOGIN: &str = "/auth/login";
    pub const ME: &str = "/me";
    pub const STATES: &str = "/states";
    pub const GEOCODE: &str = "/geocode";
    pub const SEASON_NOW: &str = "/season_now";
    pub const LIVE_CROPS: &str = "/live_crops";
    pub const ANALYTICS_EVENT: &str = "/analytics/event";
    pub const CROP_RULES: &str = "/admin/crop_rules";

    pub fn crop_rule(id: i64) -> String {
        format!("{}/{}", CROP_RULES, id)
    }
}

#[derive(Clone)]
pub struct CropwiseApi {
    raw: Arc<dyn RawApiPort>,
}

impl CropwiseApi {
    pub fn new(raw: Arc<dyn RawApiPort>) -> Self {
        Self { raw }
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ServiceError> {
        self.raw.execute(request).await?.parse()
    }

    fn to_body<B: serde::Serialize>(body: &B) -> Result<Value, ServiceError> {
        serde_json::to_value(body).map_err(|e| ServiceError::Parse(e.to_string()))
    }

    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        self.call(ApiRequest::get(paths::HEALTH)).await
    }

    /// Register an account. Credentials travel as a JSON body.
    pub async fn signup(&self, credentials: &Credentials) -> Result<TokenGrant, ServiceError> {
        let body = Self::to_body(credentials)?;
        self.call(ApiRequest::post_json(paths::SIGNUP, body)).await
    }

    /// Exchange credentials for a token. Credentials travel form-encoded.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, ServiceError> {
        self.call(ApiRequest::post_form(paths::LOGIN, credentials.form_fields()))
            .await
    }

    pub async fn fetch_current_user(&self) -> Result<UserProfile, ServiceError> {
        self.call(ApiRequest::get(paths::ME)).await
    }

    pub async fn list_known_places(&self) -> Result<Vec<KnownPlace>, ServiceError> {
        self.call(ApiRequest::get(paths::STATES)).await
    }

    pub async fn geocode(&self, query: &str) -> Result<Vec<PlaceMatch>, ServiceError> {
        self.call(ApiRequest::get(paths::GEOCODE).query("query", query))
            .await
    }

    pub async fn current_season(&self, place: &str) -> Result<SeasonNow, ServiceError> {
        self.call(ApiRequest::get(paths::SEASON_NOW).query("state", place))
            .await
    }

    /// Crop suitability for `place`. Without a season the parameter is still
    /// sent, as `season=`.
    pub async fn live_crop_suitability(
        &self,
        place: &str,
        season: Option<Season>,
    ) -> Result<LiveCropResult, ServiceError> {
        let season = season.as_ref().map(Season::as_str).unwrap_or_default();
        self.call(
            ApiRequest::get(paths::LIVE_CROPS)
                .query("state", place)
                .query("season", season),
        )
        .await
    }

    pub async fn record_event(&self, event: &AnalyticsEvent) -> Result<Ack, ServiceError> {
        let body = Self::to_body(event)?;
        self.call(ApiRequest::post_json(paths::ANALYTICS_EVENT, body))
            .await
    }

    pub async fn list_crop_rules(&self) -> Result<Vec<CropRule>, ServiceError> {
        self.call(ApiRequest::get(paths::CROP_RULES)).await
    }

    pub async fn create_crop_rule(&self, input: &CropRuleInput) -> Result<CropRule, ServiceError> {
        let body = Self::to_body(input)?;
        self.call(ApiRequest::post_json(paths::CROP_RULES, body)).await
    }

    pub async fn update_crop_rule(
        &self,
        id: i64,
        input: &CropRuleInput,
    ) -> Result<CropRule, ServiceError> {
        let body = Self::to_body(input)?;
        self.call(ApiRequest::put_json(paths::crop_rule(id), body))
            .await
    }

    pub async fn delete_crop_rule(&self, id: i64) -> Result<Ack, ServiceError> {
        self.call(ApiRequest::delete(paths::crop_rule(id))).await
    }
}
