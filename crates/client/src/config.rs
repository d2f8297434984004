//! Client configuration
//!
//! Read from the environment, after `.env.local` / `.env` in the working
//! directory have been loaded:
//!
//! | Variable | Default |
//! |---|---|
//! | `CROPWISE_API_URL` (or `API_BASE_URL`) | `http://localhost:8000` |
//! | `CROPWISE_REQUEST_TIMEOUT_MS` | `20000` |
//! | `CROPWISE_STORAGE_PATH` | platform config dir |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default request timeout in milliseconds (20 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub api_base_url: String,
    /// Upper bound on a single request, send plus body read
    pub request_timeout: Duration,
    /// Token storage file; `None` means the platform default
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            storage_path: None,
        }
    }
}

impl ClientConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("CROPWISE_API_URL")
            .or_else(|_| std::env::var("API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let request_timeout = Duration::from_millis(get_request_timeout_ms());
        let storage_path = std::env::var("CROPWISE_STORAGE_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self::default()
            .with_base_url(&api_base_url)
            .map(|config| Self {
                request_timeout,
                storage_path,
                ..config
            })
    }

    /// Replace the base URL after validating it as an absolute http(s) URL.
    pub fn with_base_url(self, raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(raw)?,
            ..self
        })
    }

    pub fn with_timeout(self, request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            ..self
        }
    }
}

/// Get the request timeout from environment variable or use default
pub fn get_request_timeout_ms() -> u64 {
    std::env::var("CROPWISE_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: trimmed.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.query().is_some() {
        return Err(invalid("query strings are not allowed".to_string()));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Load `.env.local` then `.env` from the working directory, if present.
///
/// Variables already set in the environment win.
pub fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let path = std::path::Path::new(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(path) {
                tracing::warn!(file = filename, error = %e, "Failed to load env file");
            }
        }
    }
}
