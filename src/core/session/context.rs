//! Explicitly injected session context
//!
//! Every outgoing request reads the bearer token from a [`SessionContext`].
//! The context is the single place the signed-in session changes: it is
//! replaced on login and expired on logout or when the backend rejects the
//! token. Clones share the same underlying session.

use crate::config::SecretString;
use crate::domain::{IntakeError, Result, Role, User};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// An authenticated session as returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: SecretString,
    pub user: User,
}

impl Session {
    pub fn new(token: SecretString, user: User) -> Self {
        Self { token, user }
    }
}

/// Shared handle to the current session
///
/// # Example
///
/// ```rust
/// use intake::config::secret_string;
/// use intake::core::session::{Session, SessionContext};
/// use intake::domain::{Role, User};
///
/// let user = User {
///     id: "u1".to_string(),
///     email: "staff@example.com".to_string(),
///     role: Role::Staff,
///     name: None,
/// };
/// let context = SessionContext::new(Some(Session::new(secret_string("t0k3n".to_string()), user)));
/// assert_eq!(context.bearer().as_deref(), Some("Bearer t0k3n"));
///
/// context.expire();
/// assert!(!context.is_signed_in());
/// ```
#[derive(Debug, Clone)]
pub struct SessionContext {
    current: Arc<watch::Sender<Option<Arc<Session>>>>,
}

impl SessionContext {
    /// Create a context holding `session`
    pub fn new(session: Option<Session>) -> Self {
        let (sender, _) = watch::channel(session.map(Arc::new));
        Self {
            current: Arc::new(sender),
        }
    }

    /// A context with nobody signed in
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// The current session, if any
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.borrow().clone()
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<User> {
        self.current.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// `Authorization` header value for the current session
    pub fn bearer(&self) -> Option<String> {
        self.current
            .borrow()
            .as_ref()
            .map(|s| format!("Bearer {}", s.token.expose_secret().as_ref()))
    }

    /// Installs a new session
    pub fn replace(&self, session: Session) {
        tracing::debug!(user_id = %session.user.id, role = %session.user.role, "Session replaced");
        self.current.send_replace(Some(Arc::new(session)));
    }

    /// Drops the current session, returning it
    ///
    /// Anything waiting on [`SessionContext::expired`] wakes up.
    pub fn expire(&self) -> Option<Arc<Session>> {
        let previous = self.current.send_replace(None);
        if previous.is_some() {
            tracing::info!("Session expired");
        }
        previous
    }

    /// Resolves once no session is held
    ///
    /// Resolves immediately when nobody is signed in.
    pub async fn expired(&self) {
        let mut receiver = self.current.subscribe();
        // An error means the sender is gone, which also leaves no session
        let _ = receiver.wait_for(|session| session.is_none()).await;
    }

    /// Checks that the signed-in role may perform `action`
    ///
    /// # Errors
    ///
    /// - [`IntakeError::AuthExpired`] when nobody is signed in
    /// - [`IntakeError::NotPermitted`] when the role is not in `allowed`
    pub fn require_role(&self, allowed: &[Role], action: &str) -> Result<User> {
        let user = self.user().ok_or(IntakeError::AuthExpired)?;
        if !user.has_any_role(allowed) {
            tracing::warn!(user_id = %user.id, role = %user.role, action, "Role not permitted");
            return Err(IntakeError::NotPermitted(format!(
                "Your role ({}) is not permitted to {action}.",
                user.role
            )));
        }
        Ok(user)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
