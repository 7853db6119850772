//! On-disk form state for the `patient` commands
//!
//! A draft file carries the submission ID together with the draft, so every
//! invocation that retries a submit presents the same ID to the backend.
//! Rejected edits are saved under `pendingErrors` and keep blocking
//! `patient check` and `patient submit` until the field is corrected.

use crate::core::intake::FormModel;
use crate::domain::{FieldAddress, FieldErrors, IntakeError, PatientDraft, Result, SubmissionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftDocument {
    submission_id: SubmissionId,
    draft: PatientDraft,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pending_errors: BTreeMap<String, String>,
}

/// A form persisted as JSON
#[derive(Debug, Clone)]
pub struct DraftFile {
    path: PathBuf,
}

impl DraftFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the form back
    ///
    /// # Errors
    ///
    /// Unlike the session store, a missing or unreadable draft is an error:
    /// silently starting over would lose the submission ID.
    pub fn load(&self) -> Result<FormModel> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            IntakeError::Io(format!(
                "Failed to read draft {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let document: DraftDocument = serde_json::from_str(&contents).map_err(|e| {
            IntakeError::Serialization(format!(
                "Draft {} is not valid: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut pending = FieldErrors::new();
        for (path, message) in document.pending_errors {
            match path.parse::<FieldAddress>() {
                Ok(address) => pending.attach(address, message),
                Err(_) => tracing::warn!(path = %path, "Dropping pending error for unknown field"),
            }
        }

        let mut form = FormModel::restore(document.draft, document.submission_id);
        form.restore_edit_errors(pending);
        Ok(form)
    }

    /// Writes the form, replacing the file atomically
    pub fn save(&self, form: &FormModel) -> Result<()> {
        let document = DraftDocument {
            submission_id: form.submission_id().clone(),
            draft: form.draft().clone(),
            pending_errors: form
                .edit_errors()
                .iter()
                .map(|(address, message)| (address.to_string(), message.to_string()))
                .collect(),
        };
        let contents = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            submission_id = %form.submission_id(),
            "Draft saved"
        );
        Ok(())
    }
}
