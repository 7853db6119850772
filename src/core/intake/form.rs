//! Form model for one intake session
//!
//! [`FormModel`] owns the draft and the submission ID. The ID is created
//! with the form, survives every failed or blocked submit, and is replaced
//! only by [`FormModel::rotate`], which the coordinator calls after a
//! confirmed creation.

use super::schema::{validate_local, LocalValidation};
use crate::domain::field_path::MedicalField;
use crate::domain::{
    FieldAddress, FieldErrors, IntakeError, PatientDraft, Result, SubmissionId, TagList,
    UploadedDocument,
};

/// Draft plus idempotency token for one logical intake
#[derive(Debug, Clone, PartialEq)]
pub struct FormModel {
    draft: PatientDraft,
    submission_id: SubmissionId,
    /// Input that could not be applied, reported by local validation
    edit_errors: FieldErrors,
}

impl FormModel {
    /// An empty form with a fresh submission ID
    pub fn new() -> Self {
        Self::restore(PatientDraft::new(), SubmissionId::generate())
    }

    /// Resumes a form from a saved draft and its submission ID
    pub fn restore(draft: PatientDraft, submission_id: SubmissionId) -> Self {
        Self {
            draft,
            submission_id,
            edit_errors: FieldErrors::new(),
        }
    }

    pub fn draft(&self) -> &PatientDraft {
        &self.draft
    }

    pub fn submission_id(&self) -> &SubmissionId {
        &self.submission_id
    }

    /// Applies raw input to the field at `path`
    ///
    /// `path` uses the same dot/bracket notation the backend reports errors
    /// with, e.g. `personal.age` or `documents[0].type`.
    ///
    /// # Errors
    ///
    /// [`IntakeError::InvalidField`] if the path is not a form field or the
    /// value cannot be coerced. The field keeps its previous value. When the
    /// field exists in the draft, the message is also reported by
    /// [`FormModel::validate_local`] until a valid value is entered.
    pub fn edit(&mut self, path: &str, raw: &str) -> Result<()> {
        let address: FieldAddress = path.parse().map_err(|message| IntakeError::InvalidField {
            path: path.to_string(),
            message,
        })?;

        match self.draft.set_field(&address, raw) {
            Ok(()) => {
                self.edit_errors.clear_field(&address);
                Ok(())
            }
            Err(message) => {
                if self.draft.holds_value(&address) {
                    self.edit_errors.attach(address, message.clone());
                }
                Err(IntakeError::InvalidField {
                    path: address.to_string(),
                    message,
                })
            }
        }
    }

    /// Appends a tag from a tag input
    pub fn add_tag(&mut self, list: TagList, raw: &str) -> Result<()> {
        self.draft
            .add_tag(list, raw)
            .map_err(|message| IntakeError::InvalidField {
                path: FieldAddress::Medical(MedicalField::Tags(list, None)).to_string(),
                message,
            })
    }

    /// Removes a tag by position
    ///
    /// Rejected input recorded against that list is dropped, since later
    /// entries shift position.
    pub fn remove_tag(&mut self, list: TagList, index: usize) -> Option<String> {
        let removed = self.draft.remove_tag(list, index)?;
        self.edit_errors.retain_fields(|address| {
            !matches!(address, FieldAddress::Medical(MedicalField::Tags(l, _)) if *l == list)
        });
        Some(removed)
    }

    /// Appends an uploaded document
    pub fn append_document(&mut self, document: UploadedDocument) {
        self.draft.append_document(document);
    }

    /// Rejected input that is still pending, keyed by field
    pub fn edit_errors(&self) -> &FieldErrors {
        &self.edit_errors
    }

    /// Re-records rejected input, e.g. when resuming a saved form
    ///
    /// Entries for fields the draft does not hold are discarded.
    pub fn restore_edit_errors(&mut self, mut errors: FieldErrors) {
        let draft = &self.draft;
        errors.retain_fields(|address| draft.holds_value(address));
        for (address, message) in errors.iter() {
            self.edit_errors.attach(*address, message);
        }
    }

    /// Structural check of the current draft, including rejected input
    pub fn validate_local(&self) -> LocalValidation {
        let mut result = validate_local(&self.draft);
        let mut pending = self.edit_errors.clone();
        pending.retain_fields(|address| self.draft.holds_value(address));
        result.errors.merge(pending);
        result
    }

    /// Starts a new intake: empty draft, new submission ID
    pub(crate) fn rotate(&mut self) {
        let previous = std::mem::replace(self, Self::new());
        tracing::debug!(
            previous = %previous.submission_id,
            next = %self.submission_id,
            "Submission ID rotated"
        );
    }
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}
