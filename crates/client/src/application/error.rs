//! Service layer error types
//!
//! This module defines errors that can occur in the application service layer:
//! transport failures pass through untouched so their message stays the one
//! the user sees, typed interpretation failures and client-side validation
//! get their own variants.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use cropwise_domain::DomainError;

use crate::ports::outbound::ApiError;

/// Errors that can occur in service operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The backend call itself failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Failed to interpret the response body as the expected type
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Input rejected or selection failed before any request was sent
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ServiceError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ServiceError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this is an authorization error
    pub fn is_unauthorized(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_unauthorized)
    }

    pub fn is_forbidden(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_forbidden)
    }

    /// Check if this is a "not found" error, from the backend or a local lookup
    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::Api(e) => e.status() == Some(404),
            ServiceError::Domain(DomainError::NotFound { .. }) => true,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_timeout)
    }
}

/// Helper trait for interpreting a raw JSON body as a typed payload
pub trait ParseResponse {
    fn parse<T: DeserializeOwned>(self) -> Result<T, ServiceError>;
}

impl ParseResponse for Value {
    fn parse<T: DeserializeOwned>(self) -> Result<T, ServiceError> {
        serde_json::from_value(self).map_err(|e| ServiceError::Parse(e.to_string()))
    }
}
