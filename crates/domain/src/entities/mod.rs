//! Entities - payloads the backend owns and the client displays

mod analytics;
mod crop_rule;
mod crops;
mod place;
mod user;

pub use analytics::{Ack, AnalyticsEvent, HealthStatus};
pub use crop_rule::{CropRule, CropRuleInput};
pub use crops::{CropSuitability, LiveCropResult, RuleBounds, SeasonNow, WeatherMetrics};
pub use place::{KnownPlace, PlaceMatch};
pub use user::{Credentials, TokenGrant, UserProfile};
