//! Platform abstraction ports
//!
//! Persistent key-value storage sits behind a trait so the session logic is
//! identical whether tokens live in a config file or only in memory.

/// Persistent storage abstraction (file-based or in-memory)
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage key constants
///
/// These are kept in the ports layer as they define the contract for
/// what keys are used across the application.
pub mod storage_keys {
    /// Bearer token issued on signup/login
    pub const TOKEN: &str = "token";
}
