// Intake - Patient intake client
// Copyright (c) 2025 Intake Contributors
// Licensed under the MIT License

//! # Intake - patient intake client
//!
//! Intake collects a new patient's details, checks them locally, asks the
//! hospital backend to validate them and detect probable duplicates, and
//! only then creates the patient record.
//!
//! ## Overview
//!
//! This library provides:
//! - **A form model** holding the draft and an idempotent submission ID
//! - **Local validation** of required fields and formats, with no network
//! - **A submission coordinator** sequencing validate and create
//! - **A session layer** carrying the bearer token and reacting to expiry
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (intake workflow, session handling)
//! - [`adapters`] - The REST backend client
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intake::adapters::api::ApiClient;
//! use intake::config::load_config;
//! use intake::core::intake::{FormModel, SubmissionCoordinator, SubmitOutcome};
//! use intake::core::session::{SessionContext, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("intake.toml")?;
//!     let session = SessionContext::new(SessionStore::from_config(&config.session).load());
//!     let client = ApiClient::new(&config.api, session)?;
//!     let mut coordinator = SubmissionCoordinator::from_client(client);
//!
//!     let mut form = FormModel::new();
//!     form.edit("personal.firstName", "Ada")?;
//!     form.edit("personal.lastName", "Lovelace")?;
//!     form.edit("personal.dob", "1985-12-10")?;
//!     form.edit("contact.address", "12 St James's Square")?;
//!
//!     if let SubmitOutcome::Created(created) = coordinator.submit(&mut form).await? {
//!         println!("Created patient {}", created.patient_id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Idempotent Submission
//!
//! Every form carries a [`domain::SubmissionId`]. Validate and create are
//! both sent with it, and it is kept across failures, so a retried create
//! after a timeout is recognized by the backend instead of producing a
//! second record. It changes only after the backend confirms creation.
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`]. Blocked submissions are
//! ordinary [`core::intake::SubmitOutcome`] values; [`domain::IntakeError`]
//! covers transport failures, permission problems and session expiry.
//!
//! ```rust,no_run
//! use intake::domain::IntakeError;
//!
//! fn example() -> Result<(), IntakeError> {
//!     let config = intake::config::load_config("intake.toml")?;
//!     println!("Backend: {}", config.api.base_url);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
