//! Signed-in user and roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role as issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Doctor,
    Staff,
    Patient,
}

impl Role {
    /// Roles allowed to create patient records
    pub const PATIENT_INTAKE: &'static [Role] = &[Role::Doctor, Role::Staff];

    /// Roles allowed to manage doctor accounts
    pub const DOCTOR_ADMIN: &'static [Role] = &[Role::Staff];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Doctor => write!(f, "DOCTOR"),
            Role::Staff => write!(f, "STAFF"),
            Role::Patient => write!(f, "PATIENT"),
        }
    }
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Whether the user holds one of `roles`
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserialize() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "doc@example.com",
            "role": "DOCTOR",
            "name": "Dr. Example"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Doctor);
        assert!(user.has_any_role(Role::PATIENT_INTAKE));
        assert!(!user.has_any_role(Role::DOCTOR_ADMIN));
    }

    #[test]
    fn test_patient_role_cannot_intake() {
        let user = User {
            id: "u3".to_string(),
            email: "patient@example.com".to_string(),
            role: Role::Patient,
            name: None,
        };
        assert!(!user.has_any_role(Role::PATIENT_INTAKE));
    }
}
