//! Created patient records
//!
//! The create endpoint answers `201` for a new record and `200` when it
//! already holds a record for the request. A `200` alone does not say whether
//! that record came from an earlier attempt with the same submission ID or is
//! an unrelated pre-existing record, so [`CreationKind`] only reports a replay
//! when the backend echoes the submission ID back (or flags the replay).

use super::draft::PatientDraft;
use super::ids::{PatientId, SubmissionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body of the validate and create endpoints
///
/// The draft's sections sit at the top level next to `submissionId`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<'a> {
    #[serde(flatten)]
    pub draft: &'a PatientDraft,
    pub submission_id: &'a SubmissionId,
}

impl<'a> Submission<'a> {
    pub fn new(draft: &'a PatientDraft, submission_id: &'a SubmissionId) -> Self {
        Self {
            draft,
            submission_id,
        }
    }
}

/// Body of a successful create response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub patient_id: PatientId,

    /// The stored record as the backend returns it
    #[serde(default)]
    pub patient: serde_json::Value,

    /// Submission ID the backend matched on, when it echoes one
    #[serde(default)]
    pub submission_id: Option<String>,

    /// Explicit replay flag, when the backend sets one
    #[serde(default)]
    pub idempotent_replay: Option<bool>,
}

/// How the backend satisfied a create call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationKind {
    /// `201`: a new record was stored
    Created,
    /// `200` matched by this intake's submission ID: an earlier attempt already created it
    Replayed,
    /// `200` without confirmation that the match was by submission ID
    ExistingUnconfirmed,
}

impl CreationKind {
    /// Classifies a successful create response
    pub fn classify(status: u16, response: &CreateResponse, sent: &SubmissionId) -> Self {
        if status == 201 {
            return CreationKind::Created;
        }

        let echoed = response
            .submission_id
            .as_deref()
            .and_then(|s| s.parse::<SubmissionId>().ok())
            .is_some_and(|echo| &echo == sent);

        if echoed || response.idempotent_replay == Some(true) {
            CreationKind::Replayed
        } else {
            CreationKind::ExistingUnconfirmed
        }
    }
}

impl fmt::Display for CreationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationKind::Created => write!(f, "created"),
            CreationKind::Replayed => write!(f, "already created by this submission"),
            CreationKind::ExistingUnconfirmed => write!(f, "existing record returned"),
        }
    }
}

/// Result of a successful intake
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPatient {
    pub patient_id: PatientId,
    pub patient: serde_json::Value,
    pub kind: CreationKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(extra: serde_json::Value) -> CreateResponse {
        let mut body = json!({ "patientId": "P-000777", "patient": {} });
        if let (Some(obj), Some(more)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in more {
                obj.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_submission_body_shape() {
        let draft = PatientDraft::new();
        let id: SubmissionId = "7d44b88c-4199-4bad-97dc-d78268e01398".parse().unwrap();
        let body = serde_json::to_value(Submission::new(&draft, &id)).unwrap();

        assert_eq!(body["submissionId"], "7d44b88c-4199-4bad-97dc-d78268e01398");
        assert!(body["personal"].is_object());
        assert!(body["documents"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_201_is_created() {
        let sent = SubmissionId::generate();
        assert_eq!(
            CreationKind::classify(201, &response(json!({})), &sent),
            CreationKind::Created
        );
    }

    #[test]
    fn test_200_with_matching_echo_is_replay() {
        let sent = SubmissionId::generate();
        let body = response(json!({ "submissionId": sent.to_string() }));
        assert_eq!(CreationKind::classify(200, &body, &sent), CreationKind::Replayed);
    }

    #[test]
    fn test_200_with_other_echo_is_unconfirmed() {
        let sent = SubmissionId::generate();
        let other = SubmissionId::generate();
        let body = response(json!({ "submissionId": other.to_string() }));
        assert_eq!(
            CreationKind::classify(200, &body, &sent),
            CreationKind::ExistingUnconfirmed
        );
    }

    #[test]
    fn test_200_with_replay_flag_is_replay() {
        let sent = SubmissionId::generate();
        let body = response(json!({ "idempotentReplay": true }));
        assert_eq!(CreationKind::classify(200, &body, &sent), CreationKind::Replayed);
    }

    #[test]
    fn test_200_without_echo_is_unconfirmed() {
        let sent = SubmissionId::generate();
        assert_eq!(
            CreationKind::classify(200, &response(json!({})), &sent),
            CreationKind::ExistingUnconfirmed
        );
    }
}
