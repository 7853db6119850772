//! Backend seams used by the intake workflow
//!
//! The coordinator talks to the backend only through these traits, so tests
//! can drive it with in-memory implementations. [`super::ApiClient`]
//! implements all of them over REST.

use super::auth::Credentials;
use super::uploads::DocumentFile;
use crate::core::session::Session;
use crate::domain::{
    CreatedPatient, DocumentType, Result, Submission, UploadedDocument, ValidationResult,
};
use async_trait::async_trait;

/// Asks the backend whether a draft is acceptable and whether it collides
/// with existing records
#[async_trait]
pub trait ValidationGateway: Send + Sync {
    /// Validates the draft and submission ID
    ///
    /// # Errors
    ///
    /// Transport failures and `401` responses. Field errors and duplicates
    /// are part of a successful [`ValidationResult`].
    async fn validate(&self, submission: &Submission<'_>) -> Result<ValidationResult>;
}

/// Creates patient records
#[async_trait]
pub trait PatientRegistry: Send + Sync {
    /// Creates the record, or returns the one the backend already holds
    /// for this submission
    async fn create(&self, submission: &Submission<'_>) -> Result<CreatedPatient>;
}

/// Stores document files and hands back a reference to attach to a draft
#[async_trait]
pub trait DocumentUploader: Send + Sync {
    async fn upload(&self, file: &DocumentFile, doc_type: DocumentType)
        -> Result<UploadedDocument>;
}

/// Exchanges credentials for a session
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session>;
}
