//! State containers for client-side dependency injection
//!
//! This module contains containers that aggregate adapters behind port traits.
//! These are concrete implementations, not port definitions.

mod session;

pub use session::Session;
