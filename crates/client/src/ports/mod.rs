//! Port definitions (hexagonal boundaries)

pub mod outbound;
