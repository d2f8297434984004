//! Value objects - Immutable objects defined by their attributes

mod season;
mod session_token;
mod suitability;

pub use season::{deserialize_optional_season, Season};
pub use session_token::SessionToken;
pub use suitability::SuitabilityTag;
