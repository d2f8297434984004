//! Latest-request-wins tracking
//!
//! Each logical query (`geocode`, `season_now`, `live_crops`) gets a
//! monotonically increasing sequence number. A response may only update state
//! if no newer request for the same key has been issued since it began;
//! otherwise it is discarded, success or failure alike.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;

/// Query keys used by the services
pub mod keys {
    pub const GEOCODE: &str = "geocode";
    pub const SEASON_NOW: &str = "season_now";
    pub const LIVE_CROPS: &str = "live_crops";
}

/// Handle for one issued request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    key: String,
    seq: u64,
}

impl RequestTicket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Default)]
pub struct LatestRequestTracker {
    latest: Arc<DashMap<String, u64>>,
}

impl LatestRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one for `key`.
    pub fn begin(&self, key: &str) -> RequestTicket {
        let mut entry = self.latest.entry(key.to_string()).or_insert(0);
        *entry += 1;
        RequestTicket {
            key: key.to_string(),
            seq: *entry,
        }
    }

    pub fn is_latest(&self, ticket: &RequestTicket) -> bool {
        self.latest
            .get(&ticket.key)
            .is_some_and(|seq| *seq == ticket.seq)
    }

    /// Await `fut` under a fresh ticket for `key`.
    ///
    /// Returns `None` when a newer request for the same key began before this
    /// one finished.
    pub async fn run<F, T>(&self, key: &str, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin(key);
        let output = fut.await;
        if self.is_latest(&ticket) {
            Some(output)
        } else {
            tracing::debug!(key, seq = ticket.seq, "Discarding stale response");
            None
        }
    }
}
