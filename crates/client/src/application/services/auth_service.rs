//! Auth Service - signup, login, logout and session restore
//!
//! Successful signup or login stores the issued token in the [`Session`];
//! every later request carries it until logout.

use cropwise_domain::{Credentials, DomainError, SessionToken, UserProfile};

use crate::application::api::CropwiseApi;
use crate::application::ServiceError;
use crate::state::Session;

#[derive(Clone)]
pub struct AuthService {
    api: CropwiseApi,
    session: Session,
}

impl AuthService {
    pub fn new(api: CropwiseApi, session: Session) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Create an account and sign in with it.
    pub async fn signup(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        validate_credentials(credentials)?;
        let grant = self.api.signup(credentials).await?;
        self.store(grant.session_token())?;
        tracing::info!(username = %credentials.username, "Signed up");
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        validate_credentials(credentials)?;
        let grant = self.api.login(credentials).await?;
        self.store(grant.session_token())?;
        tracing::info!(username = %credentials.username, "Logged in");
        Ok(())
    }

    /// Forget the stored token. Never touches the network.
    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("Logged out");
    }

    pub async fn current_user(&self) -> Result<UserProfile, ServiceError> {
        self.api.fetch_current_user().await
    }

    /// Startup check of a previously stored token.
    ///
    /// With no token this returns `None` without a request. Otherwise `/me` is
    /// asked; any failure clears the token and also yields `None`.
    pub async fn restore_session(&self) -> Option<UserProfile> {
        if !self.session.is_authenticated() {
            return None;
        }

        match self.api.fetch_current_user().await {
            Ok(profile) => {
                tracing::debug!(username = %profile.username, "Session restored");
                Some(profile)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Stored token rejected, clearing session");
                self.session.logout();
                None
            }
        }
    }

    fn store(&self, token: Option<SessionToken>) -> Result<(), ServiceError> {
        let token = token
            .ok_or_else(|| ServiceError::Parse("Backend issued an empty access token".to_string()))?;
        self.session.login(&token);
        Ok(())
    }
}

/// Reject blank credentials before they are sent
pub fn validate_credentials(credentials: &Credentials) -> Result<(), DomainError> {
    if credentials.username.trim().is_empty() {
        return Err(DomainError::validation("Username cannot be empty"));
    }
    if credentials.password.is_empty() {
        return Err(DomainError::validation("Password cannot be empty"));
    }
    Ok(())
}
