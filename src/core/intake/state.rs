//! Submission state exposed to the surrounding UI

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where one submit attempt stands
///
/// ```text
/// Idle -> Validating -> FieldErrorsShown | DuplicatesShown | Creating
/// Creating -> Idle (created, fresh submission ID) | Idle (failed, same ID)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    /// Waiting on the validation gateway
    Validating,
    /// Waiting on the create endpoint
    Creating,
    /// Blocked on local or server field errors
    FieldErrorsShown,
    /// Blocked on probable duplicates pending review
    DuplicatesShown,
}

impl SubmissionState {
    /// Whether a gateway call is outstanding; submit is disabled meanwhile
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::Creating)
    }

    /// Whether the last attempt was stopped for review or correction
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            SubmissionState::FieldErrorsShown | SubmissionState::DuplicatesShown
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Validating => write!(f, "validating"),
            SubmissionState::Creating => write!(f, "creating"),
            SubmissionState::FieldErrorsShown => write!(f, "field errors"),
            SubmissionState::DuplicatesShown => write!(f, "duplicates"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_states() {
        assert!(SubmissionState::Validating.is_busy());
        assert!(SubmissionState::Creating.is_busy());
        assert!(!SubmissionState::Idle.is_busy());
        assert!(!SubmissionState::DuplicatesShown.is_busy());
    }

    #[test]
    fn test_blocked_states() {
        assert!(SubmissionState::FieldErrorsShown.is_blocked());
        assert!(SubmissionState::DuplicatesShown.is_blocked());
        assert!(!SubmissionState::Creating.is_blocked());
    }
}
