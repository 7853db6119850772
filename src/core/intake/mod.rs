//! Patient intake workflow
//!
//! - [`form`] - the draft and its submission ID
//! - [`schema`] - local structural validation
//! - [`state`] - submission state machine
//! - [`coordinator`] - validate, then create, with idempotent retries

pub mod coordinator;
pub mod form;
pub mod schema;
pub mod state;

pub use coordinator::{SubmissionCoordinator, SubmitOutcome};
pub use form::FormModel;
pub use schema::{validate_local, LocalValidation, MAX_AGE};
pub use state::SubmissionState;
