//! Crop Service - current season and live crop suitability
//!
//! Both lookups are latest-wins per query key: when the user changes place
//! or season again before an answer arrives, the older answer is dropped.

use cropwise_domain::{LiveCropResult, Season, SeasonNow};

use crate::application::api::CropwiseApi;
use crate::application::latest::{keys, LatestRequestTracker};
use crate::application::ServiceError;

#[derive(Clone)]
pub struct CropService {
    api: CropwiseApi,
    tracker: LatestRequestTracker,
}

impl CropService {
    pub fn new(api: CropwiseApi, tracker: LatestRequestTracker) -> Self {
        Self { api, tracker }
    }

    /// Season the backend infers for `place` right now.
    ///
    /// `Ok(None)` means a newer season lookup superseded this one.
    pub async fn current_season(&self, place: &str) -> Result<Option<SeasonNow>, ServiceError> {
        self.tracker
            .run(keys::SEASON_NOW, self.api.current_season(place))
            .await
            .transpose()
    }

    /// Crop suitability for `place`, optionally restricted to `season`.
    ///
    /// `Ok(None)` means a newer crop lookup superseded this one.
    pub async fn live_crops(
        &self,
        place: &str,
        season: Option<Season>,
    ) -> Result<Option<LiveCropResult>, ServiceError> {
        let result = self
            .tracker
            .run(keys::LIVE_CROPS, self.api.live_crop_suitability(place, season))
            .await
            .transpose()?;

        if let Some(result) = &result {
            tracing::debug!(
                place,
                season = ?result.season,
                crops = result.crops.len(),
                "Live crop suitability"
            );
        }
        Ok(result)
    }
}
