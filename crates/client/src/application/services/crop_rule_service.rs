//! Crop Rule Service - admin management of crop rules
//!
//! Input is validated before it is sent. Authorization is the backend's call:
//! non-admin tokens come back as 403.

use cropwise_domain::{Ack, CropRule, CropRuleInput};

use crate::application::api::CropwiseApi;
use crate::application::ServiceError;

#[derive(Clone)]
pub struct CropRuleService {
    api: CropwiseApi,
}

impl CropRuleService {
    pub fn new(api: CropwiseApi) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<CropRule>, ServiceError> {
        self.api.list_crop_rules().await
    }

    pub async fn create(&self, input: &CropRuleInput) -> Result<CropRule, ServiceError> {
        input.validate()?;
        let rule = self.api.create_crop_rule(input).await?;
        tracing::info!(id = rule.id, name = %rule.name, "Crop rule created");
        Ok(rule)
    }

    pub async fn update(&self, id: i64, input: &CropRuleInput) -> Result<CropRule, ServiceError> {
        input.validate()?;
        let rule = self.api.update_crop_rule(id, input).await?;
        tracing::info!(id, name = %rule.name, "Crop rule updated");
        Ok(rule)
    }

    pub async fn delete(&self, id: i64) -> Result<Ack, ServiceError> {
        let ack = self.api.delete_crop_rule(id).await?;
        tracing::info!(id, "Crop rule deleted");
        Ok(ack)
    }
}
