//! Top-level session controller
//!
//! The data layer never navigates. Expired tokens come back as
//! [`IntakeError::AuthExpired`] and the controller turns them into a cleared
//! session plus a [`Navigation::Login`] decision for whoever owns the screen.

use super::context::SessionContext;
use super::store::SessionStore;
use crate::adapters::api::{Authenticator, Credentials};
use crate::domain::{IntakeError, Result, User};
use std::sync::Arc;

/// Where the caller should go after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Keep the current screen
    Stay,
    /// Leave for the login entry point
    Login,
}

/// Owns login, logout and session-expiry handling
pub struct SessionController {
    store: SessionStore,
    context: SessionContext,
    authenticator: Arc<dyn Authenticator>,
}

impl SessionController {
    /// Create a controller whose context starts from the stored session
    pub fn restore(store: SessionStore, authenticator: Arc<dyn Authenticator>) -> Self {
        let context = SessionContext::new(store.load());
        Self {
            store,
            context,
            authenticator,
        }
    }

    /// Create a controller over an existing context
    pub fn new(
        store: SessionStore,
        context: SessionContext,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            store,
            context,
            authenticator,
        }
    }

    /// The context shared with the networking layer
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Signs in and persists the session
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let session = self.authenticator.login(credentials).await?;
        let user = session.user.clone();
        self.store.save(&session)?;
        self.context.replace(session);

        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(user)
    }

    /// Signs out
    pub fn logout(&self) -> Result<Navigation> {
        self.context.expire();
        self.store.clear()?;
        tracing::info!("Signed out");
        Ok(Navigation::Login)
    }

    /// Decides navigation for an error returned by any operation
    ///
    /// An expired session is cleared from both the context and the store.
    /// Every other error leaves the session alone.
    pub fn handle_error(&self, error: &IntakeError) -> Navigation {
        if !error.is_auth_expired() {
            return Navigation::Stay;
        }

        self.context.expire();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear expired session");
        }
        Navigation::Login
    }
}
