//! Doctor accounts managed by staff

use super::ids::DoctorId;
use serde::{Deserialize, Serialize};

/// A doctor account as returned by the backend
///
/// Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(alias = "_id")]
    pub id: DoctorId,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Search results, normalized
///
/// The backend answers either with a bare array or with `{ "items": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DoctorList {
    pub items: Vec<Doctor>,
}

impl<'de> Deserialize<'de> for DoctorList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Bare(Vec<Doctor>),
            Wrapped {
                #[serde(default)]
                items: Vec<Doctor>,
            },
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Bare(items) | Shape::Wrapped { items } => DoctorList { items },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_normalizes() {
        let list: DoctorList = serde_json::from_value(json!([
            { "_id": "d1", "email": "a@example.com", "name": "Dr. A", "specialization": "Cardiology" }
        ]))
        .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id.as_str(), "d1");
        assert_eq!(list.items[0].extra["specialization"], "Cardiology");
    }

    #[test]
    fn test_wrapped_items_normalizes() {
        let list: DoctorList =
            serde_json::from_value(json!({ "items": [{ "id": "d2" }], "total": 1 })).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id.as_str(), "d2");
    }
}
