//! Places known to or resolved by the backend

use serde::{Deserialize, Serialize};

/// A geocoding candidate for a free-text query.
///
/// Held only in client state while the user is picking a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMatch {
    /// Display name, e.g. "Guntur, Andhra Pradesh, IN"
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// A place the backend has cached from earlier lookups (`/states`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Number of lookups that hit this cache entry
    #[serde(default)]
    pub hits: u32,
}
