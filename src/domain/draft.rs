//! Patient draft model
//!
//! [`PatientDraft`] is the mutable record a form session edits before it is
//! submitted. Field names serialize in camelCase to match the backend's JSON
//! contract. Input coercion lives here too: a blank age becomes absent rather
//! than zero, and blank optional strings become absent.

use super::field_path::{
    ContactField, DocumentField, FieldAddress, MedicalField, PersonalField, TagList,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient gender as accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(format!(
                "Invalid gender '{other}'. Must be one of: MALE, FEMALE, OTHER"
            )),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
            Gender::Other => write!(f, "OTHER"),
        }
    }
}

/// Kind of an attached document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Id,
    Report,
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ID" => Ok(DocumentType::Id),
            "REPORT" => Ok(DocumentType::Report),
            other => Err(format!(
                "Invalid document type '{other}'. Must be one of: ID, REPORT"
            )),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Id => write!(f, "ID"),
            DocumentType::Report => write!(f, "REPORT"),
        }
    }
}

/// A document reference attached to the draft
///
/// Uploads produce these; the draft never removes or deduplicates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub url: String,
}

impl UploadedDocument {
    /// Create a new document reference
    pub fn new(doc_type: DocumentType, url: impl Into<String>) -> Self {
        Self {
            doc_type,
            url: url.into(),
        }
    }
}

/// Personal section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Date of birth, `YYYY-MM-DD`
    #[serde(default)]
    pub dob: String,

    #[serde(default, deserialize_with = "age_input")]
    pub age: Option<i64>,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub nic: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub passport: Option<String>,
}

/// Contact section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub address: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
}

/// Medical section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    #[serde(default)]
    pub history: String,

    #[serde(default)]
    pub allergies: Vec<String>,

    #[serde(default)]
    pub conditions: Vec<String>,
}

impl MedicalInfo {
    fn tags_mut(&mut self, list: TagList) -> &mut Vec<String> {
        match list {
            TagList::Allergies => &mut self.allergies,
            TagList::Conditions => &mut self.conditions,
        }
    }

    /// Tags of one list
    pub fn tags(&self, list: TagList) -> &[String] {
        match list {
            TagList::Allergies => &self.allergies,
            TagList::Conditions => &self.conditions,
        }
    }
}

/// The patient record being composed by one form session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    #[serde(default)]
    pub personal: PersonalInfo,

    #[serde(default)]
    pub contact: ContactInfo,

    #[serde(default)]
    pub medical: MedicalInfo,

    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
}

impl PatientDraft {
    /// An empty draft, as a freshly mounted form shows it
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document, preserving order
    ///
    /// Never deduplicates: attaching the same URL twice yields two entries.
    pub fn append_document(&mut self, document: UploadedDocument) {
        self.documents.push(document);
    }

    /// Sets a field from raw form input
    ///
    /// Applies the same coercions the JSON form of the draft does. On error
    /// the draft is unchanged and the message is meant for display next to
    /// the field.
    pub fn set_field(&mut self, address: &FieldAddress, raw: &str) -> Result<(), String> {
        match address {
            FieldAddress::Personal(field) => {
                let personal = &mut self.personal;
                match field {
                    PersonalField::FirstName => personal.first_name = raw.to_string(),
                    PersonalField::LastName => personal.last_name = raw.to_string(),
                    PersonalField::Dob => personal.dob = raw.trim().to_string(),
                    PersonalField::Age => personal.age = parse_age(raw)?,
                    PersonalField::Gender => personal.gender = raw.parse()?,
                    PersonalField::Nic => personal.nic = non_blank(raw),
                    PersonalField::Passport => personal.passport = non_blank(raw),
                }
            }
            FieldAddress::Contact(field) => {
                let contact = &mut self.contact;
                match field {
                    ContactField::Address => contact.address = raw.to_string(),
                    ContactField::Phone => contact.phone = non_blank(raw),
                    ContactField::Email => contact.email = non_blank(raw),
                }
            }
            FieldAddress::Medical(MedicalField::History) => {
                self.medical.history = raw.to_string();
            }
            FieldAddress::Medical(MedicalField::Tags(list, None)) => {
                self.add_tag(*list, raw)?;
            }
            FieldAddress::Medical(MedicalField::Tags(list, Some(index))) => {
                let value = tag_value(raw).ok_or_else(|| "Tag cannot be empty".to_string())?;
                let tags = self.medical.tags_mut(*list);
                let slot = tags
                    .get_mut(*index)
                    .ok_or_else(|| format!("No entry at position {index}"))?;
                *slot = value;
            }
            FieldAddress::Documents => {
                return Err("Documents are added by uploading a file".to_string());
            }
            FieldAddress::Document { index, field } => {
                let document = self
                    .documents
                    .get_mut(*index)
                    .ok_or_else(|| format!("No document at position {index}"))?;
                match field {
                    Some(DocumentField::Type) => document.doc_type = raw.parse()?,
                    Some(DocumentField::Url) => document.url = raw.trim().to_string(),
                    None => return Err("Select the document's type or url".to_string()),
                }
            }
        }
        Ok(())
    }

    /// True when `address` names a single value that exists in this draft
    ///
    /// Whole lists, a document without a field, and entries past the end of
    /// a list are not values.
    pub fn holds_value(&self, address: &FieldAddress) -> bool {
        match address {
            FieldAddress::Personal(_)
            | FieldAddress::Contact(_)
            | FieldAddress::Medical(MedicalField::History) => true,
            FieldAddress::Medical(MedicalField::Tags(list, Some(index))) => {
                *index < self.medical.tags(*list).len()
            }
            FieldAddress::Document {
                index,
                field: Some(_),
            } => *index < self.documents.len(),
            FieldAddress::Medical(MedicalField::Tags(_, None))
            | FieldAddress::Documents
            | FieldAddress::Document { field: None, .. } => false,
        }
    }

    /// Appends a tag entered in a tag input
    ///
    /// The value is trimmed and a trailing comma (the tag separator) is
    /// stripped; blank input is rejected.
    pub fn add_tag(&mut self, list: TagList, raw: &str) -> Result<(), String> {
        let value = tag_value(raw).ok_or_else(|| "Tag cannot be empty".to_string())?;
        self.medical.tags_mut(list).push(value);
        Ok(())
    }

    /// Removes the tag at `index`, returning it
    pub fn remove_tag(&mut self, list: TagList, index: usize) -> Option<String> {
        let tags = self.medical.tags_mut(list);
        if index < tags.len() {
            Some(tags.remove(index))
        } else {
            None
        }
    }
}

fn tag_value(raw: &str) -> Option<String> {
    let value = raw.trim();
    let value = value.strip_suffix(',').unwrap_or(value).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Coerces age input: blank is absent, anything else must be an integer
///
/// Range is not checked here; local validation reports out-of-range ages
/// against the field.
pub fn parse_age(raw: &str) -> Result<Option<i64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| "Age must be a whole number".to_string())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(non_blank))
}

fn age_input<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AgeInput {
        Number(i64),
        Text(String),
    }

    match Option::<AgeInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(AgeInput::Number(n)) => Ok(Some(n)),
        Some(AgeInput::Text(text)) => parse_age(&text).map_err(serde::de::Error::custom),
    }
}
