//! Field paths and typed form-field addresses
//!
//! The backend reports field errors against path strings such as
//! `contact.email` or `documents[0].url`. A [`FieldPath`] is the parsed form
//! of such a string (a sequence of key and index segments) and a
//! [`FieldAddress`] is the result of walking that path over the known shape of
//! [`crate::domain::PatientDraft`]. Only addresses that exist in the draft's
//! shape can be constructed, so error attachment and form edits never rely on
//! string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One segment of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key, e.g. `contact`
    Key(String),
    /// Array index, e.g. the `0` in `documents[0]`
    Index(usize),
}

/// Parsed dot/bracket field path
///
/// Both `documents[0].url` and `documents.0.url` parse to the same segments,
/// since the latter is how form libraries commonly spell array positions.
///
/// # Examples
///
/// ```
/// use intake::domain::field_path::{FieldPath, PathSegment};
///
/// let path: FieldPath = "documents[1].url".parse().unwrap();
/// assert_eq!(
///     path.segments(),
///     &[
///         PathSegment::Key("documents".to_string()),
///         PathSegment::Index(1),
///         PathSegment::Key("url".to_string()),
///     ]
/// );
/// assert_eq!(path.to_string(), "documents[1].url");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Returns the parsed segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl FromStr for FieldPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err("Field path cannot be empty".to_string());
        }

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut chars = input.chars().peekable();
        // Set after `]` so that `a[0].b` does not see an empty key before `.b`
        let mut after_index = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() {
                        if !after_index {
                            return Err(format!("Empty segment in field path '{input}'"));
                        }
                    } else {
                        segments.push(key_or_index(std::mem::take(&mut key)));
                    }
                    after_index = false;
                    if chars.peek().is_none() {
                        return Err(format!("Field path '{input}' ends with '.'"));
                    }
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(key_or_index(std::mem::take(&mut key)));
                    } else if segments.is_empty() {
                        return Err(format!("Field path '{input}' starts with an index"));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) if d.is_ascii_digit() => digits.push(d),
                            Some(other) => {
                                return Err(format!(
                                    "Invalid character '{other}' in index of field path '{input}'"
                                ))
                            }
                            None => return Err(format!("Unclosed '[' in field path '{input}'")),
                        }
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| format!("Empty index in field path '{input}'"))?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                }
                ']' => return Err(format!("Unexpected ']' in field path '{input}'")),
                other => {
                    if after_index {
                        return Err(format!(
                            "Expected '.' or '[' after index in field path '{input}'"
                        ));
                    }
                    key.push(other);
                }
            }
        }

        if !key.is_empty() {
            segments.push(key_or_index(key));
        }

        Ok(Self(segments))
    }
}

fn key_or_index(raw: String) -> PathSegment {
    match raw.parse::<usize>() {
        Ok(index) if raw.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(index),
        _ => PathSegment::Key(raw),
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Fields of the personal section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PersonalField {
    FirstName,
    LastName,
    Dob,
    Age,
    Gender,
    Nic,
    Passport,
}

/// Fields of the contact section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactField {
    Address,
    Phone,
    Email,
}

/// The two tag lists of the medical section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagList {
    Allergies,
    Conditions,
}

impl TagList {
    fn key(&self) -> &'static str {
        match self {
            TagList::Allergies => "allergies",
            TagList::Conditions => "conditions",
        }
    }
}

impl FromStr for TagList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "allergies" => Ok(TagList::Allergies),
            "conditions" => Ok(TagList::Conditions),
            other => Err(format!(
                "Unknown tag list '{other}'. Must be one of: allergies, conditions"
            )),
        }
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Fields of the medical section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MedicalField {
    History,
    /// A whole tag list, or one entry of it
    Tags(TagList, Option<usize>),
}

/// Fields of one attached document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentField {
    Type,
    Url,
}

/// Typed address of a field in the patient draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldAddress {
    Personal(PersonalField),
    Contact(ContactField),
    Medical(MedicalField),
    /// The documents list as a whole
    Documents,
    /// One document, or one field of it
    Document {
        index: usize,
        field: Option<DocumentField>,
    },
}

impl FieldAddress {
    /// Walks a parsed path over the draft's shape
    ///
    /// Returns `None` when the path names something the draft does not have.
    pub fn resolve(path: &FieldPath) -> Option<Self> {
        use PathSegment::{Index, Key};

        let segments: Vec<Segment<'_>> = path
            .segments()
            .iter()
            .map(|s| match s {
                Key(k) => Segment::Key(k.as_str()),
                Index(i) => Segment::Index(*i),
            })
            .collect();

        match segments.as_slice() {
            [Segment::Key("personal"), Segment::Key(field)] => {
                let field = match *field {
                    "firstName" => PersonalField::FirstName,
                    "lastName" => PersonalField::LastName,
                    "dob" => PersonalField::Dob,
                    "age" => PersonalField::Age,
                    "gender" => PersonalField::Gender,
                    "nic" => PersonalField::Nic,
                    "passport" => PersonalField::Passport,
                    _ => return None,
                };
                Some(FieldAddress::Personal(field))
            }
            [Segment::Key("contact"), Segment::Key(field)] => {
                let field = match *field {
                    "address" => ContactField::Address,
                    "phone" => ContactField::Phone,
                    "email" => ContactField::Email,
                    _ => return None,
                };
                Some(FieldAddress::Contact(field))
            }
            [Segment::Key("medical"), Segment::Key("history")] => {
                Some(FieldAddress::Medical(MedicalField::History))
            }
            [Segment::Key("medical"), Segment::Key(list), rest @ ..] => {
                let list: TagList = list.parse().ok()?;
                match rest {
                    [] => Some(FieldAddress::Medical(MedicalField::Tags(list, None))),
                    [Segment::Index(i)] => {
                        Some(FieldAddress::Medical(MedicalField::Tags(list, Some(*i))))
                    }
                    _ => None,
                }
            }
            [Segment::Key("documents")] => Some(FieldAddress::Documents),
            [Segment::Key("documents"), Segment::Index(index), rest @ ..] => {
                let field = match rest {
                    [] => None,
                    [Segment::Key("type")] => Some(DocumentField::Type),
                    [Segment::Key("url")] => Some(DocumentField::Url),
                    _ => return None,
                };
                Some(FieldAddress::Document {
                    index: *index,
                    field,
                })
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

impl FromStr for FieldAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path: FieldPath = s.parse()?;
        FieldAddress::resolve(&path).ok_or_else(|| format!("Unknown form field '{s}'"))
    }
}

impl fmt::Display for FieldAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAddress::Personal(field) => {
                let name = match field {
                    PersonalField::FirstName => "firstName",
                    PersonalField::LastName => "lastName",
                    PersonalField::Dob => "dob",
                    PersonalField::Age => "age",
                    PersonalField::Gender => "gender",
                    PersonalField::Nic => "nic",
                    PersonalField::Passport => "passport",
                };
                write!(f, "personal.{name}")
            }
            FieldAddress::Contact(field) => {
                let name = match field {
                    ContactField::Address => "address",
                    ContactField::Phone => "phone",
                    ContactField::Email => "email",
                };
                write!(f, "contact.{name}")
            }
            FieldAddress::Medical(MedicalField::History) => write!(f, "medical.history"),
            FieldAddress::Medical(MedicalField::Tags(list, index)) => {
                let name = list.key();
                match index {
                    Some(i) => write!(f, "medical.{name}[{i}]"),
                    None => write!(f, "medical.{name}"),
                }
            }
            FieldAddress::Documents => write!(f, "documents"),
            FieldAddress::Document { index, field } => match field {
                Some(DocumentField::Type) => write!(f, "documents[{index}].type"),
                Some(DocumentField::Url) => write!(f, "documents[{index}].url"),
                None => write!(f, "documents[{index}]"),
            },
        }
    }
}
