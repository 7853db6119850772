//! Patient validation and creation endpoints

use super::client::{decode, ApiClient};
use super::traits::{PatientRegistry, ValidationGateway};
use crate::domain::{
    ApiError, CreateResponse, CreatedPatient, CreationKind, Result, Submission, ValidationResult,
};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};

#[async_trait]
impl ValidationGateway for ApiClient {
    async fn validate(&self, submission: &Submission<'_>) -> Result<ValidationResult> {
        tracing::debug!(
            submission_id = %submission.submission_id,
            documents = submission.draft.documents.len(),
            "Validating patient draft"
        );

        let request = self
            .request(Method::POST, "/patients/validate")
            .json(submission);
        let response = self.send(request).await?;
        let result: ValidationResult = decode(response).await?;

        tracing::debug!(
            submission_id = %submission.submission_id,
            field_errors = result.field_errors.len(),
            duplicates = result.duplicates.len(),
            "Validation response received"
        );

        Ok(result)
    }
}

#[async_trait]
impl PatientRegistry for ApiClient {
    async fn create(&self, submission: &Submission<'_>) -> Result<CreatedPatient> {
        let request = self.request(Method::POST, "/patients").json(submission);
        let response = self.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(ApiError::InvalidResponse(format!(
                "Unexpected status {status} from patient creation"
            ))
            .into());
        }

        let body: CreateResponse = decode(response).await?;
        let kind = CreationKind::classify(status.as_u16(), &body, submission.submission_id);

        tracing::info!(
            submission_id = %submission.submission_id,
            patient_id = %body.patient_id,
            status = status.as_u16(),
            kind = ?kind,
            "Patient record accepted"
        );

        Ok(CreatedPatient {
            patient_id: body.patient_id,
            patient: body.patient,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, ApiConfig};
    use crate::core::session::{Session, SessionContext};
    use crate::domain::{IntakeError, PatientDraft, Role, SubmissionId, User};
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        let config = ApiConfig {
            base_url: format!("{}/api", server.url()),
            ..Default::default()
        };
        let session = Session::new(
            secret_string("tok".to_string()),
            User {
                id: "u1".to_string(),
                email: "staff@example.com".to_string(),
                role: Role::Staff,
                name: None,
            },
        );
        ApiClient::new(&config, SessionContext::new(Some(session))).unwrap()
    }

    #[tokio::test]
    async fn test_validate_sends_draft_and_submission_id() {
        let mut server = mockito::Server::new_async().await;
        let id = SubmissionId::generate();
        let mock = server
            .mock("POST", "/api/patients/validate")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::PartialJson(json!({
                "submissionId": id.to_string(),
                "personal": { "gender": "OTHER" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"fieldErrors":[],"duplicates":[]}"#)
            .create_async()
            .await;

        let draft = PatientDraft::new();
        let result = client(&server)
            .validate(&Submission::new(&draft, &id))
            .await
            .unwrap();

        assert!(result.field_errors.is_empty());
        assert!(result.duplicates.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_201_is_created() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/patients")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"patientId":"P-000101","patient":{"_id":"abc"}}"#)
            .create_async()
            .await;

        let draft = PatientDraft::new();
        let id = SubmissionId::generate();
        let created = client(&server)
            .create(&Submission::new(&draft, &id))
            .await
            .unwrap();

        assert_eq!(created.patient_id.as_str(), "P-000101");
        assert_eq!(created.kind, CreationKind::Created);
    }

    #[tokio::test]
    async fn test_create_200_with_echo_is_replay() {
        let mut server = mockito::Server::new_async().await;
        let id = SubmissionId::generate();
        server
            .mock("POST", "/api/patients")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "patientId": "P-000101", "patient": {}, "submissionId": id.to_string() })
                    .to_string(),
            )
            .create_async()
            .await;

        let draft = PatientDraft::new();
        let created = client(&server)
            .create(&Submission::new(&draft, &id))
            .await
            .unwrap();
        assert_eq!(created.kind, CreationKind::Replayed);
    }

    #[tokio::test]
    async fn test_create_202_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/patients")
            .with_status(202)
            .with_body(r#"{"patientId":"P-1"}"#)
            .create_async()
            .await;

        let draft = PatientDraft::new();
        let id = SubmissionId::generate();
        let err = client(&server)
            .create(&Submission::new(&draft, &id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Transport(ApiError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_create_blank_patient_id_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/patients")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"patientId":""}"#)
            .create_async()
            .await;

        let draft = PatientDraft::new();
        let id = SubmissionId::generate();
        let err = client(&server)
            .create(&Submission::new(&draft, &id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Transport(ApiError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_create_401_is_auth_expired() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/patients")
            .with_status(401)
            .create_async()
            .await;

        let draft = PatientDraft::new();
        let id = SubmissionId::generate();
        let err = client(&server)
            .create(&Submission::new(&draft, &id))
            .await
            .unwrap_err();
        assert!(err.is_auth_expired());
    }
}
