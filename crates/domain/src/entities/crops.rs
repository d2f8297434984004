//! Season inference and live crop suitability results
//!
//! Both are computed server-side from a short-range weather forecast for the
//! resolved place. The client only displays them; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::value_objects::{deserialize_optional_season, Season, SuitabilityTag};

/// Forecast aggregates the backend scored against
///
/// Either value is `None` when the forecast had no usable samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherMetrics {
    pub avg_temp_c: Option<f64>,
    pub total_rain_mm: Option<f64>,
}

/// Inferred season for "now" at a place (`/season_now`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonNow {
    pub season: Season,
    /// Resolved display name of the place
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Calendar month (1-12) the inference was made for
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub metrics: WeatherMetrics,
}

/// Temperature and rainfall window a crop rule accepts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleBounds {
    pub temp_min: f64,
    pub temp_max: f64,
    pub rain_min: f64,
    pub rain_max: f64,
}

/// One scored crop within a [`LiveCropResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSuitability {
    pub crop: String,
    pub score: f64,
    pub tag: SuitabilityTag,
    pub rule: RuleBounds,
    #[serde(default)]
    pub avg_temp_c: Option<f64>,
    #[serde(default)]
    pub total_rain_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_season")]
    pub season: Option<Season>,
}

/// Crop suitability for a place and season (`/live_crops`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveCropResult {
    /// Resolved display name of the place
    pub state: String,
    /// Season the crops were filtered by; `None` when asked with a blank season
    #[serde(default, deserialize_with = "deserialize_optional_season")]
    pub season: Option<Season>,
    #[serde(default)]
    pub metrics: WeatherMetrics,
    #[serde(default)]
    pub crops: Vec<CropSuitability>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LiveCropResult {
    /// Best-scoring crop, if any rule matched the season
    pub fn top_crop(&self) -> Option<&CropSuitability> {
        self.crops
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }

    /// Crops tagged Good or better
    pub fn recommended(&self) -> impl Iterator<Item = &CropSuitability> {
        self.crops.iter().filter(|c| c.tag.is_recommended())
    }
}
