//! Shared command bootstrap and exit-code mapping

use crate::adapters::api::ApiClient;
use crate::config::load_config;
use crate::core::session::{Navigation, SessionContext, SessionController, SessionStore};
use crate::domain::{IntakeError, Result};
use std::sync::Arc;

/// Process exit codes
pub mod exit_code {
    pub const OK: i32 = 0;
    /// Submission blocked, operation not permitted, or invalid input
    pub const BLOCKED: i32 = 1;
    pub const CONFIG: i32 = 2;
    /// No session, or the backend rejected the token
    pub const SESSION: i32 = 3;
    pub const TRANSPORT: i32 = 4;
    pub const FATAL: i32 = 5;
    /// Interrupted by Ctrl+C or SIGTERM
    pub const INTERRUPTED: i32 = 130;
}

/// Exit code for an error that stopped a command
pub fn exit_code_for(error: &IntakeError) -> i32 {
    match error {
        IntakeError::Configuration(_) => exit_code::CONFIG,
        IntakeError::AuthExpired => exit_code::SESSION,
        IntakeError::NotPermitted(_) | IntakeError::InvalidField { .. } => exit_code::BLOCKED,
        IntakeError::Transport(_) | IntakeError::Upload(_) => exit_code::TRANSPORT,
        IntakeError::Session(_) | IntakeError::Serialization(_) | IntakeError::Io(_) => {
            exit_code::FATAL
        }
    }
}

/// Everything a backend-facing command needs
pub struct App {
    pub client: ApiClient,
    pub controller: SessionController,
}

impl App {
    /// Loads configuration and restores the stored session
    pub fn load(config_path: &str) -> Result<Self> {
        let config = load_config(config_path)?;
        let store = SessionStore::from_config(&config.session);
        let context = SessionContext::new(store.load());
        let client = ApiClient::new(&config.api, context.clone())?;
        let controller = SessionController::new(store, context, Arc::new(client.clone()));

        tracing::debug!(
            base_url = %client.base_url(),
            signed_in = controller.context().is_signed_in(),
            "Command context ready"
        );

        Ok(Self {
            client,
            controller,
        })
    }

    pub fn session(&self) -> &SessionContext {
        self.controller.context()
    }

    /// Reports an error to the user and returns the exit code
    ///
    /// An expired session is cleared before the user is sent to login.
    pub fn fail(&self, error: &IntakeError) -> i32 {
        if self.controller.handle_error(error) == Navigation::Login {
            println!("⚠️  Your session has expired or you are not signed in");
            println!("   Run `intake login --email <email>` to sign in");
        } else {
            println!("❌ {}", error.banner_message());
        }
        exit_code_for(error)
    }
}

/// Loads the app or reports why it could not be loaded
pub fn load_or_report(config_path: &str) -> std::result::Result<App, i32> {
    App::load(config_path).map_err(|e| {
        tracing::error!(error = %e, config_path = %config_path, "Failed to start");
        println!("❌ {e}");
        exit_code_for(&e)
    })
}
