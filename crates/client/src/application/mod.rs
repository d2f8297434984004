//! Application layer - Use cases and orchestration

pub mod api;
pub mod error;
pub mod latest;
pub mod services;

// Re-export common types
pub use api::CropwiseApi;
pub use error::{ParseResponse, ServiceError};
pub use latest::{LatestRequestTracker, RequestTicket};
