//! Infrastructure adapters
//!
//! Concrete implementations of the outbound ports: the HTTP executor and the
//! storage providers.

pub mod http_client;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use http_client::ApiAdapter;
