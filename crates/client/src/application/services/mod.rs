//! Application services - use cases the front end calls

pub mod analytics_service;
pub mod auth_service;
pub mod crop_rule_service;
pub mod crop_service;
pub mod place_service;

pub use analytics_service::AnalyticsService;
pub use auth_service::{validate_credentials, AuthService};
pub use crop_rule_service::CropRuleService;
pub use crop_service::CropService;
pub use place_service::PlaceService;
