//! API error taxonomy
//!
//! Every failure of the HTTP boundary collapses into one of three kinds.
//! `Display` yields the human-readable message UI code shows verbatim:
//!
//! - non-2xx status: the response body if non-empty, else `HTTP <status>`
//! - timeout: `Request timed out`
//! - anything else on the wire: the underlying cause, else `Network error`

use thiserror::Error;

/// Message used when a request exceeds its time budget
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Message used when a network failure carries no description
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Failure of a single backend call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{}", http_status_message(.code, .body))]
    HttpStatus { code: u16, body: String },

    /// No complete response within the request's time budget
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// Connection, transport, or decode failure
    #[error("{}", network_message(.cause))]
    Network { cause: Option<String> },
}

fn http_status_message(code: &u16, body: &str) -> String {
    if body.is_empty() {
        format!("HTTP {}", code)
    } else {
        body.to_string()
    }
}

fn network_message(cause: &Option<String>) -> &str {
    match cause.as_deref() {
        Some(cause) if !cause.is_empty() => cause,
        _ => NETWORK_ERROR_MESSAGE,
    }
}

impl ApiError {
    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network {
            cause: Some(cause.into()),
        }
    }

    /// Human-readable message for display
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status code, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this is an authentication failure (bad or expired token)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if the backend refused the caller (e.g. non-admin on admin routes)
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
