//! Local structural validation of a patient draft
//!
//! Runs before any network call. It checks presence of required fields,
//! ranges and formats only; duplicates are a server-side concept.

use crate::domain::field_path::{ContactField, DocumentField, PersonalField};
use crate::domain::{FieldAddress, FieldErrors, PatientDraft};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Oldest accepted age, inclusive
pub const MAX_AGE: i64 = 150;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Outcome of local validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalValidation {
    pub errors: FieldErrors,
}

impl LocalValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates the draft's shape
///
/// Pure: never touches the network and never mutates the draft.
///
/// # Example
///
/// ```rust
/// use intake::core::intake::validate_local;
/// use intake::domain::PatientDraft;
///
/// let result = validate_local(&PatientDraft::new());
/// assert!(!result.is_valid());
/// ```
pub fn validate_local(draft: &PatientDraft) -> LocalValidation {
    let mut errors = FieldErrors::new();
    let personal = &draft.personal;

    if personal.first_name.trim().is_empty() {
        errors.attach(
            FieldAddress::Personal(PersonalField::FirstName),
            "First name is required",
        );
    }

    if personal.last_name.trim().is_empty() {
        errors.attach(
            FieldAddress::Personal(PersonalField::LastName),
            "Last name is required",
        );
    }

    let dob = personal.dob.trim();
    if dob.is_empty() {
        errors.attach(
            FieldAddress::Personal(PersonalField::Dob),
            "Date of birth is required",
        );
    } else if NaiveDate::parse_from_str(dob, "%Y-%m-%d").is_err() {
        errors.attach(
            FieldAddress::Personal(PersonalField::Dob),
            "Date of birth must be a valid date (YYYY-MM-DD)",
        );
    }

    if let Some(age) = personal.age {
        if !(0..=MAX_AGE).contains(&age) {
            errors.attach(
                FieldAddress::Personal(PersonalField::Age),
                format!("Age must be between 0 and {MAX_AGE}"),
            );
        }
    }

    if draft.contact.address.trim().is_empty() {
        errors.attach(
            FieldAddress::Contact(ContactField::Address),
            "Address is required",
        );
    }

    if let Some(email) = draft.contact.email.as_deref() {
        if !EMAIL_PATTERN.is_match(email.trim()) {
            errors.attach(FieldAddress::Contact(ContactField::Email), "Invalid email");
        }
    }

    for (index, document) in draft.documents.iter().enumerate() {
        if url::Url::parse(document.url.trim()).is_err() {
            errors.attach(
                FieldAddress::Document {
                    index,
                    field: Some(DocumentField::Url),
                },
                "Document URL must be a valid URL",
            );
        }
    }

    LocalValidation { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentType, UploadedDocument};
    use test_case::test_case;

    fn valid_draft() -> PatientDraft {
        let mut draft = PatientDraft::new();
        draft.personal.first_name = "Ada".to_string();
        draft.personal.last_name = "Lovelace".to_string();
        draft.personal.dob = "1985-12-10".to_string();
        draft.contact.address = "12 St James's Square, London".to_string();
        draft
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_local(&valid_draft()).is_valid());
    }

    #[test]
    fn test_empty_first_name() {
        let mut draft = valid_draft();
        draft.personal.first_name = "   ".to_string();

        let result = validate_local(&draft);
        assert_eq!(
            result
                .errors
                .get(&FieldAddress::Personal(PersonalField::FirstName)),
            Some("First name is required")
        );
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_empty_draft_reports_every_required_field() {
        let result = validate_local(&PatientDraft::new());
        assert_eq!(result.errors.len(), 4);
        assert_eq!(
            result.errors.get(&FieldAddress::Contact(ContactField::Address)),
            Some("Address is required")
        );
    }

    #[test_case("1985-02-30" ; "impossible day")]
    #[test_case("10/12/1985" ; "wrong format")]
    fn test_invalid_dob(dob: &str) {
        let mut draft = valid_draft();
        draft.personal.dob = dob.to_string();
        let result = validate_local(&draft);
        assert!(result
            .errors
            .get(&FieldAddress::Personal(PersonalField::Dob))
            .is_some());
    }

    #[test_case(Some(0), true)]
    #[test_case(Some(150), true)]
    #[test_case(Some(151), false)]
    #[test_case(Some(-1), false)]
    #[test_case(None, true)]
    fn test_age_range(age: Option<i64>, valid: bool) {
        let mut draft = valid_draft();
        draft.personal.age = age;
        assert_eq!(validate_local(&draft).is_valid(), valid);
    }

    #[test_case("ada@example.com", true)]
    #[test_case("ada@example", false)]
    #[test_case("ada example@x.com", false)]
    fn test_email_format(email: &str, valid: bool) {
        let mut draft = valid_draft();
        draft.contact.email = Some(email.to_string());
        assert_eq!(validate_local(&draft).is_valid(), valid);
    }

    #[test]
    fn test_document_url_must_parse() {
        let mut draft = valid_draft();
        draft.append_document(UploadedDocument::new(
            DocumentType::Id,
            "https://files.example.com/id.pdf",
        ));
        draft.append_document(UploadedDocument::new(DocumentType::Report, "not a url"));

        let result = validate_local(&draft);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors.get(&FieldAddress::Document {
                index: 1,
                field: Some(DocumentField::Url)
            }),
            Some("Document URL must be a valid URL")
        );
    }
}
