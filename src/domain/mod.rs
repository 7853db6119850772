//! Domain models and types for Intake.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The patient draft** ([`PatientDraft`] and its sections)
//! - **Field addressing** ([`FieldPath`], [`FieldAddress`]) used to place
//!   errors and apply edits without string-keyed reflection
//! - **Validator results** ([`ValidationResult`], [`DuplicateCandidate`],
//!   [`FieldErrors`])
//! - **Strongly-typed identifiers** ([`SubmissionId`], [`PatientId`], [`DoctorId`])
//! - **Error types** ([`IntakeError`], [`ApiError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use intake::domain::{FieldAddress, PatientDraft};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut draft = PatientDraft::new();
//! let first_name: FieldAddress = "personal.firstName".parse()?;
//! draft.set_field(&first_name, "Ada")?;
//! assert_eq!(draft.personal.first_name, "Ada");
//! # Ok(())
//! # }
//! ```

pub mod doctor;
pub mod draft;
pub mod errors;
pub mod field_path;
pub mod ids;
pub mod patient;
pub mod result;
pub mod user;
pub mod validation;

// Re-export commonly used types for convenience
pub use doctor::{Doctor, DoctorList};
pub use draft::{
    ContactInfo, DocumentType, Gender, MedicalInfo, PatientDraft, PersonalInfo, UploadedDocument,
};
pub use errors::{ApiError, IntakeError};
pub use field_path::{FieldAddress, FieldPath, TagList};
pub use ids::{DoctorId, PatientId, SubmissionId};
pub use patient::{CreateResponse, CreatedPatient, CreationKind, Submission};
pub use result::Result;
pub use user::{Role, User};
pub use validation::{
    DuplicateCandidate, FieldErrors, ServerFieldError, ValidationResult, ValidationVerdict,
};
