//! Configuration management for Intake.
//!
//! Intake uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `INTAKE_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://hospital.example.com/api"
//! timeout_seconds = 30
//!
//! [session]
//! path = "${HOME}/.intake/session.json"
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/intake"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use intake::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("intake.toml")?;
//! println!("Backend: {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApiConfig, ApplicationConfig, Environment, IntakeConfig, LoggingConfig, SessionConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
