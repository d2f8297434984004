//! CropWise domain types.
//!
//! Wire payloads of the CropWise backend, the value objects they are built
//! from, and the domain error type. No I/O lives here.

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{
    Ack, AnalyticsEvent, CropRule, CropRuleInput, CropSuitability, Credentials, HealthStatus,
    KnownPlace, LiveCropResult, PlaceMatch, RuleBounds, SeasonNow, TokenGrant, UserProfile,
    WeatherMetrics,
};
pub use error::DomainError;
pub use value_objects::{Season, SessionToken, SuitabilityTag};
