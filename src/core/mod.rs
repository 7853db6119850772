//! Core business logic for Intake.
//!
//! # Modules
//!
//! - [`intake`] - form model, local validation and the submission coordinator
//! - [`session`] - the signed-in user, token persistence and auth expiry
//!
//! # Submission Workflow
//!
//! 1. **Role gate**: only doctors and staff may create patients
//! 2. **Local validation**: required fields and formats, no network
//! 3. **Remote validation**: field errors first, then probable duplicates
//! 4. **Create**: sent with the same submission ID as validation
//! 5. **Rotate**: a confirmed creation starts a fresh draft and ID
//!
//! # Example
//!
//! ```rust,no_run
//! use intake::adapters::api::ApiClient;
//! use intake::config::load_config;
//! use intake::core::intake::{FormModel, SubmissionCoordinator, SubmitOutcome};
//! use intake::core::session::{SessionContext, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("intake.toml")?;
//! let session = SessionContext::new(SessionStore::from_config(&config.session).load());
//! let client = ApiClient::new(&config.api, session)?;
//! let mut coordinator = SubmissionCoordinator::from_client(client);
//!
//! let mut form = FormModel::new();
//! form.edit("personal.firstName", "Ada")?;
//!
//! match coordinator.submit(&mut form).await? {
//!     SubmitOutcome::Created(created) => println!("Created {}", created.patient_id),
//!     other => println!("Not created: {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

pub mod intake;
pub mod session;
