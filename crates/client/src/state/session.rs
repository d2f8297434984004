//! Session container
//!
//! `Session` is the one place that knows where the bearer token lives. It is
//! created once by the composition root and handed to the HTTP adapter and to
//! the auth service, so there is no ambient global token: reads happen at
//! call time, writes only through [`Session::login`] and [`Session::logout`].
//!
//! The storage backend is type-erased behind an `Arc<dyn ...>` so the session
//! stays `Clone + Send + Sync` regardless of provider.

use std::sync::Arc;

use cropwise_domain::SessionToken;

use crate::ports::outbound::{storage_keys, StorageProvider};

/// Token holder shared by the adapter and services
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn StorageProviderDyn>,
}

// =============================================================================
// Dynamic trait version for Arc storage
// =============================================================================

trait StorageProviderDyn: Send + Sync {
    fn save(&self, key: &str, value: &str);
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

impl<T: StorageProvider + Send + Sync> StorageProviderDyn for T {
    fn save(&self, key: &str, value: &str) {
        StorageProvider::save(self, key, value)
    }
    fn load(&self, key: &str) -> Option<String> {
        StorageProvider::load(self, key)
    }
    fn remove(&self, key: &str) {
        StorageProvider::remove(self, key)
    }
}

impl Session {
    pub fn new<S>(storage: S) -> Self
    where
        S: StorageProvider + Send + Sync,
    {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Stored token, if any. A blank stored value counts as no token.
    pub fn token(&self) -> Option<SessionToken> {
        self.storage
            .load(storage_keys::TOKEN)
            .and_then(SessionToken::new)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a freshly issued token; later requests carry it.
    pub fn login(&self, token: &SessionToken) {
        self.storage.save(storage_keys::TOKEN, token.as_str());
        tracing::debug!("Session token stored");
    }

    /// Forget the token; later requests go out unauthenticated.
    pub fn logout(&self) {
        self.storage.remove(storage_keys::TOKEN);
        tracing::debug!("Session token cleared");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
