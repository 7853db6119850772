//! Validation results and field-scoped errors
//!
//! This module holds what the backend's validator returns
//! ([`ValidationResult`]), the duplicate candidates it may report, and
//! [`FieldErrors`], the per-field error map the form displays inline.

use super::field_path::{FieldAddress, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One field error as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFieldError {
    /// Dot/bracket path of the offending field
    #[serde(default)]
    pub path: String,

    /// Human-readable message; older backends send it as `msg`
    #[serde(alias = "msg", default)]
    pub message: String,
}

impl ServerFieldError {
    /// Create a new server field error
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Identifying details of a possibly matching personal section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePersonal {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub nic: Option<String>,
}

/// Identifying details of a possibly matching contact section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CandidateContact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An existing patient record that plausibly matches the draft
///
/// The backend sends partial records; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCandidate {
    /// Storage key of the record
    #[serde(rename = "_id", default)]
    pub record_id: Option<String>,

    /// Generated patient ID
    #[serde(default)]
    pub patient_id: Option<String>,

    #[serde(default)]
    pub personal: CandidatePersonal,

    #[serde(default)]
    pub contact: CandidateContact,
}

impl DuplicateCandidate {
    /// Full name, or `-` when the backend sent none
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.personal.first_name, &self.personal.last_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// One-line identifying summary: name, patient ID, email, phone, NIC
    pub fn summary(&self) -> String {
        format!(
            "{} • {} • {} • {} • NIC: {}",
            self.display_name(),
            dash(&self.patient_id),
            dash(&self.contact.email),
            dash(&self.contact.phone),
            dash(&self.personal.nic),
        )
    }
}

fn dash(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

/// Response of the remote validator
///
/// Both lists may be populated; [`ValidationResult::verdict`] applies the
/// priority order (field errors before duplicates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(default)]
    pub field_errors: Vec<ServerFieldError>,

    #[serde(default)]
    pub duplicates: Vec<DuplicateCandidate>,
}

/// What a validation result means for the submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// Server-side rule violations; blocks creation
    FieldErrors,
    /// Well-formed but matches existing records; blocks creation pending review
    Duplicates,
    /// Safe to create
    Clean,
}

impl ValidationResult {
    /// Classifies the result; field errors take priority over duplicates
    pub fn verdict(&self) -> ValidationVerdict {
        if !self.field_errors.is_empty() {
            ValidationVerdict::FieldErrors
        } else if !self.duplicates.is_empty() {
            ValidationVerdict::Duplicates
        } else {
            ValidationVerdict::Clean
        }
    }
}

/// Field-scoped error map shown inline on the form
///
/// Errors whose path does not resolve to a known field are kept in
/// [`FieldErrors::unmapped`] so they can still be listed in the form-level
/// banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    fields: BTreeMap<FieldAddress, String>,
    unmapped: Vec<ServerFieldError>,
}

impl FieldErrors {
    /// An empty error map
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a message to a field
    ///
    /// A later message for the same field replaces the earlier one.
    pub fn attach(&mut self, address: FieldAddress, message: impl Into<String>) {
        self.fields.insert(address, message.into());
    }

    /// Maps backend errors onto form fields
    ///
    /// Bracket-array paths (`documents[0].url`) and dotted index paths
    /// (`documents.0.url`) both resolve to the same field.
    pub fn from_server(errors: &[ServerFieldError]) -> Self {
        let mut mapped = Self::new();
        for error in errors {
            let address = error
                .path
                .parse::<FieldPath>()
                .ok()
                .and_then(|path| FieldAddress::resolve(&path));
            match address {
                Some(address) => mapped.attach(address, error.message.clone()),
                None => {
                    tracing::debug!(path = %error.path, "Field error path not on the form");
                    mapped.unmapped.push(error.clone());
                }
            }
        }
        mapped
    }

    /// Merges another map into this one, keeping existing messages
    pub fn merge(&mut self, other: FieldErrors) {
        for (address, message) in other.fields {
            self.fields.entry(address).or_insert(message);
        }
        self.unmapped.extend(other.unmapped);
    }

    /// Removes the error of one field
    pub fn clear_field(&mut self, address: &FieldAddress) {
        self.fields.remove(address);
    }

    /// Keeps only the field errors whose address passes `keep`
    pub fn retain_fields(&mut self, mut keep: impl FnMut(&FieldAddress) -> bool) {
        self.fields.retain(|address, _| keep(address));
    }

    /// Message attached to a field
    pub fn get(&self, address: &FieldAddress) -> Option<&str> {
        self.fields.get(address).map(String::as_str)
    }

    /// Errors that could not be placed on a field
    pub fn unmapped(&self) -> &[ServerFieldError] {
        &self.unmapped
    }

    /// Iterates field errors in form order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldAddress, &str)> {
        self.fields.iter().map(|(a, m)| (a, m.as_str()))
    }

    /// Total number of errors, mapped and unmapped
    pub fn len(&self) -> usize {
        self.fields.len() + self.unmapped.len()
    }

    /// True when there is nothing to display
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.unmapped.is_empty()
    }
}
