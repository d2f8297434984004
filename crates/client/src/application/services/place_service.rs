//! Place Service - geocoding search and place selection
//!
//! Holds the candidates of the current search and the place the user picked.
//! A new search clears the previous candidates before it is issued; if another
//! search starts before it answers, its response is dropped.

use std::sync::{Arc, RwLock};

use cropwise_domain::{DomainError, KnownPlace, PlaceMatch};

use crate::application::api::CropwiseApi;
use crate::application::latest::{keys, LatestRequestTracker};
use crate::application::ServiceError;

#[derive(Debug, Default)]
struct PlaceState {
    results: Vec<PlaceMatch>,
    active: Option<PlaceMatch>,
}

#[derive(Clone)]
pub struct PlaceService {
    api: CropwiseApi,
    tracker: LatestRequestTracker,
    state: Arc<RwLock<PlaceState>>,
}

impl PlaceService {
    pub fn new(api: CropwiseApi, tracker: LatestRequestTracker) -> Self {
        Self {
            api,
            tracker,
            state: Arc::new(RwLock::new(PlaceState::default())),
        }
    }

    /// Places the backend has resolved before, most looked-up first
    pub async fn known_places(&self) -> Result<Vec<KnownPlace>, ServiceError> {
        self.api.list_known_places().await
    }

    /// Geocode `query` and replace the current candidates.
    ///
    /// Returns `Ok(None)` when a newer search superseded this one; state is
    /// left to the newer search in that case.
    pub async fn search(&self, query: &str) -> Result<Option<Vec<PlaceMatch>>, ServiceError> {
        self.write(|state| state.results.clear());

        let Some(outcome) = self.tracker.run(keys::GEOCODE, self.api.geocode(query)).await else {
            return Ok(None);
        };
        let matches = outcome?;

        tracing::debug!(query, count = matches.len(), "Geocode results");
        self.write(|state| state.results = matches.clone());
        Ok(Some(matches))
    }

    /// Candidates of the most recent completed search
    pub fn results(&self) -> Vec<PlaceMatch> {
        self.read(|state| state.results.clone()).unwrap_or_default()
    }

    /// Make the candidate at `index` the active place. No request is sent.
    pub fn select(&self, index: usize) -> Result<PlaceMatch, ServiceError> {
        let selected = self
            .read(|state| state.results.get(index).cloned())
            .flatten()
            .ok_or_else(|| DomainError::not_found("PlaceMatch", index.to_string()))?;

        self.write(|state| state.active = Some(selected.clone()));
        tracing::debug!(place = %selected.name, "Place selected");
        Ok(selected)
    }

    pub fn active_place(&self) -> Option<PlaceMatch> {
        self.read(|state| state.active.clone()).flatten()
    }

    fn read<T>(&self, f: impl FnOnce(&PlaceState) -> T) -> Option<T> {
        match self.state.read() {
            Ok(guard) => Some(f(&guard)),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for place state: {}", e);
                None
            }
        }
    }

    fn write(&self, f: impl FnOnce(&mut PlaceState)) {
        match self.state.write() {
            Ok(mut guard) => f(&mut guard),
            Err(e) => tracing::error!("Failed to acquire write lock for place state: {}", e),
        }
    }
}
