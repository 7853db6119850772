//! Submission coordinator
//!
//! Drives one submit from an edited draft to either a created record or a
//! blocked state awaiting the user:
//!
//! 1. Role gate and local validation; a structurally invalid draft never
//!    reaches the network
//! 2. `validate` with the draft and the current submission ID
//! 3. Field errors take priority over duplicates; either one stops here
//! 4. `create` with the same submission ID
//! 5. On success the form rotates to a fresh draft and a new ID; on failure
//!    the draft and ID are kept so a retry is the same logical attempt
//!
//! Submit takes `&mut self`, so a second submit cannot start while one is
//! outstanding. Dropping the submit future abandons the call and leaves
//! the form untouched.

use super::form::FormModel;
use super::state::SubmissionState;
use crate::adapters::api::{
    ApiClient, DocumentFile, DocumentUploader, PatientRegistry, ValidationGateway,
};
use crate::core::session::SessionContext;
use crate::domain::{
    CreatedPatient, DocumentType, DuplicateCandidate, FieldErrors, IntakeError, Result, Role,
    Submission, UploadedDocument, ValidationVerdict,
};
use crate::{log_error_with_context, log_submit_attempt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// How a submit attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent
    Blocked(FieldErrors),
    /// The backend reported field errors
    Rejected(FieldErrors),
    /// The backend found probable duplicates pending review
    Duplicates(Vec<DuplicateCandidate>),
    /// The record was created (or the backend already held it)
    Created(CreatedPatient),
}

impl SubmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }
}

/// Orchestrates validate and create for one form
pub struct SubmissionCoordinator {
    gateway: Arc<dyn ValidationGateway>,
    registry: Arc<dyn PatientRegistry>,
    uploader: Arc<dyn DocumentUploader>,
    session: SessionContext,
    state: Arc<watch::Sender<SubmissionState>>,
    field_errors: FieldErrors,
    duplicates: Vec<DuplicateCandidate>,
    banner: Option<String>,
}

impl SubmissionCoordinator {
    pub fn new(
        gateway: Arc<dyn ValidationGateway>,
        registry: Arc<dyn PatientRegistry>,
        uploader: Arc<dyn DocumentUploader>,
        session: SessionContext,
    ) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            gateway,
            registry,
            uploader,
            session,
            state: Arc::new(state),
            field_errors: FieldErrors::new(),
            duplicates: Vec::new(),
            banner: None,
        }
    }

    /// A coordinator backed by the REST client for every seam
    pub fn from_client(client: ApiClient) -> Self {
        let session = client.session().clone();
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client, session)
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    /// Watches state changes, including the busy phases of a submit
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Whether submit is currently allowed
    pub fn can_submit(&self) -> bool {
        !self.state().is_busy()
    }

    /// Field errors from the last attempt, kept until the next one starts
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Duplicate candidates from the last attempt
    pub fn duplicates(&self) -> &[DuplicateCandidate] {
        &self.duplicates
    }

    /// Message for the single error banner, if any
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Runs one submit attempt for `form`
    ///
    /// # Errors
    ///
    /// - [`IntakeError::AuthExpired`] when nobody is signed in, the backend
    ///   answers `401`, or the session expires while a call is in flight
    /// - [`IntakeError::NotPermitted`] for roles that may not create patients
    /// - [`IntakeError::Transport`] when validate or create fails; the draft
    ///   and submission ID are left as they were
    pub async fn submit(&mut self, form: &mut FormModel) -> Result<SubmitOutcome> {
        if let Err(e) = self
            .session
            .require_role(Role::PATIENT_INTAKE, "create patients")
        {
            self.report(&e);
            return Err(e);
        }

        self.field_errors = FieldErrors::new();
        self.duplicates.clear();
        self.banner = None;

        let local = form.validate_local();
        if !local.is_valid() {
            tracing::debug!(errors = local.errors.len(), "Draft failed local validation");
            self.field_errors = local.errors.clone();
            self.state.send_replace(SubmissionState::FieldErrorsShown);
            return Ok(SubmitOutcome::Blocked(local.errors));
        }

        let submission_id = form.submission_id().clone();
        log_submit_attempt!(&submission_id, form.draft().documents.len());

        let in_flight = InFlight::enter(&self.state, SubmissionState::Validating);
        let submission = Submission::new(form.draft(), &submission_id);

        let result = match self.preempt(self.gateway.validate(&submission)).await {
            Ok(result) => result,
            Err(e) => {
                in_flight.settle(SubmissionState::Idle);
                self.report(&e);
                return Err(e);
            }
        };

        match result.verdict() {
            ValidationVerdict::FieldErrors => {
                let errors = FieldErrors::from_server(&result.field_errors);
                tracing::info!(
                    submission_id = %submission_id,
                    errors = errors.len(),
                    "Backend rejected fields"
                );
                self.field_errors = errors.clone();
                in_flight.settle(SubmissionState::FieldErrorsShown);
                return Ok(SubmitOutcome::Rejected(errors));
            }
            ValidationVerdict::Duplicates => {
                tracing::info!(
                    submission_id = %submission_id,
                    candidates = result.duplicates.len(),
                    "Probable duplicates found"
                );
                self.duplicates = result.duplicates.clone();
                in_flight.settle(SubmissionState::DuplicatesShown);
                return Ok(SubmitOutcome::Duplicates(result.duplicates));
            }
            ValidationVerdict::Clean => {}
        }

        in_flight.advance(SubmissionState::Creating);
        let created = match self.preempt(self.registry.create(&submission)).await {
            Ok(created) => created,
            Err(e) => {
                in_flight.settle(SubmissionState::Idle);
                self.report(&e);
                return Err(e);
            }
        };

        form.rotate();
        in_flight.settle(SubmissionState::Idle);
        tracing::info!(
            submission_id = %submission_id,
            patient_id = %created.patient_id,
            kind = %created.kind,
            "Patient created"
        );
        Ok(SubmitOutcome::Created(created))
    }

    /// Uploads a document and appends it to the form's draft
    ///
    /// Independent of the validate/create cycle: it does not change the
    /// submission state. On failure the draft is unchanged.
    pub async fn attach_upload(
        &mut self,
        form: &mut FormModel,
        file: &DocumentFile,
        doc_type: DocumentType,
    ) -> Result<UploadedDocument> {
        match self.preempt(self.uploader.upload(file, doc_type)).await {
            Ok(document) => {
                form.append_document(document.clone());
                Ok(document)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Races `call` against session expiry; expiry wins
    async fn preempt<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.session.expired() => {
                tracing::warn!("Session expired while a call was in flight");
                Err(IntakeError::AuthExpired)
            }
            result = call => result,
        }
    }

    /// Records an error for display; auth expiry is left to the session layer
    fn report(&mut self, error: &IntakeError) {
        if error.is_auth_expired() {
            return;
        }
        log_error_with_context!(error, "Submission failed");
        self.banner = Some(error.banner_message());
    }
}

/// Publishes a busy phase and guarantees it ends
///
/// If the submit future is dropped mid-call the state falls back to idle.
struct InFlight {
    state: Arc<watch::Sender<SubmissionState>>,
    settled: bool,
}

impl InFlight {
    fn enter(state: &Arc<watch::Sender<SubmissionState>>, phase: SubmissionState) -> Self {
        state.send_replace(phase);
        Self {
            state: state.clone(),
            settled: false,
        }
    }

    fn advance(&self, phase: SubmissionState) {
        self.state.send_replace(phase);
    }

    fn settle(mut self, outcome: SubmissionState) {
        self.state.send_replace(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.settled {
            self.state.send_replace(SubmissionState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::core::session::Session;
    use crate::domain::{
        ApiError, CreationKind, PatientId, ServerFieldError, SubmissionId, User, ValidationResult,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory backend recording every call
    #[derive(Default)]
    struct FakeBackend {
        validate_results: Mutex<Vec<Result<ValidationResult>>>,
        create_results: Mutex<Vec<Result<CreatedPatient>>>,
        validated: Mutex<Vec<SubmissionId>>,
        created: Mutex<Vec<SubmissionId>>,
    }

    impl FakeBackend {
        fn validate_returns(self, result: Result<ValidationResult>) -> Self {
            self.validate_results.lock().unwrap().push(result);
            self
        }

        fn create_returns(self, result: Result<CreatedPatient>) -> Self {
            self.create_results.lock().unwrap().push(result);
            self
        }
    }

    #[async_trait]
    impl ValidationGateway for FakeBackend {
        async fn validate(&self, submission: &Submission<'_>) -> Result<ValidationResult> {
            self.validated
                .lock()
                .unwrap()
                .push(submission.submission_id.clone());
            self.validate_results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ValidationResult::default()))
        }
    }

    #[async_trait]
    impl PatientRegistry for FakeBackend {
        async fn create(&self, submission: &Submission<'_>) -> Result<CreatedPatient> {
            self.created
                .lock()
                .unwrap()
                .push(submission.submission_id.clone());
            self.create_results.lock().unwrap().pop().unwrap_or_else(|| {
                Ok(CreatedPatient {
                    patient_id: PatientId::new("P-000001").unwrap(),
                    patient: serde_json::Value::Null,
                    kind: CreationKind::Created,
                })
            })
        }
    }

    #[async_trait]
    impl DocumentUploader for FakeBackend {
        async fn upload(
            &self,
            file: &DocumentFile,
            doc_type: DocumentType,
        ) -> Result<UploadedDocument> {
            Ok(UploadedDocument::new(
                doc_type,
                format!("https://files.example.com/{}", file.file_name()),
            ))
        }
    }

    fn signed_in(role: Role) -> SessionContext {
        SessionContext::new(Some(Session::new(
            secret_string("tok".to_string()),
            User {
                id: "u1".to_string(),
                email: "staff@example.com".to_string(),
                role,
                name: None,
            },
        )))
    }

    fn coordinator(backend: Arc<FakeBackend>, session: SessionContext) -> SubmissionCoordinator {
        SubmissionCoordinator::new(backend.clone(), backend.clone(), backend, session)
    }

    fn filled_form() -> FormModel {
        let mut form = FormModel::new();
        form.edit("personal.firstName", "Ada").unwrap();
        form.edit("personal.lastName", "Lovelace").unwrap();
        form.edit("personal.dob", "1985-12-10").unwrap();
        form.edit("contact.address", "12 St James's Square").unwrap();
        form
    }

    #[tokio::test]
    async fn test_local_errors_skip_network() {
        let backend = Arc::new(FakeBackend::default());
        let mut coordinator = coordinator(backend.clone(), signed_in(Role::Staff));
        let mut form = filled_form();
        form.edit("personal.firstName", "").unwrap();

        let outcome = coordinator.submit(&mut form).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
        assert_eq!(coordinator.state(), SubmissionState::FieldErrorsShown);
        assert!(backend.validated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_patient_role_is_blocked_before_network() {
        let backend = Arc::new(FakeBackend::default());
        let mut coordinator = coordinator(backend.clone(), signed_in(Role::Patient));
        let mut form = filled_form();

        let err = coordinator.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, IntakeError::NotPermitted(_)));
        assert_eq!(
            coordinator.banner(),
            Some("Your role (PATIENT) is not permitted to create patients.")
        );
        assert!(backend.validated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_field_errors_take_priority_over_duplicates() {
        let result = ValidationResult {
            field_errors: vec![ServerFieldError::new("contact.email", "Invalid email")],
            duplicates: vec![DuplicateCandidate::default()],
        };
        let backend = Arc::new(FakeBackend::default().validate_returns(Ok(result)));
        let mut coordinator = coordinator(backend.clone(), signed_in(Role::Doctor));
        let mut form = filled_form();

        let outcome = coordinator.submit(&mut form).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(coordinator.duplicates().is_empty());
        assert_eq!(coordinator.state(), SubmissionState::FieldErrorsShown);
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clean_creates_and_rotates() {
        let backend = Arc::new(FakeBackend::default());
        let mut coordinator = coordinator(backend.clone(), signed_in(Role::Staff));
        let mut form = filled_form();
        let id = form.submission_id().clone();

        let outcome = coordinator.submit(&mut form).await.unwrap();
        assert!(outcome.is_created());
        assert_eq!(backend.validated.lock().unwrap().as_slice(), &[id.clone()]);
        assert_eq!(backend.created.lock().unwrap().as_slice(), &[id.clone()]);
        assert_ne!(form.submission_id(), &id);
        assert_eq!(coordinator.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_id_and_shows_banner() {
        let backend = Arc::new(FakeBackend::default().create_returns(Err(ApiError::ServerError {
            status: 500,
            message: "Database unavailable".to_string(),
        }
        .into())));
        let mut coordinator = coordinator(backend.clone(), signed_in(Role::Staff));
        let mut form = filled_form();
        let id = form.submission_id().clone();

        let err = coordinator.submit(&mut form).await.unwrap_err();
        assert!(matches!(err, IntakeError::Transport(_)));
        assert_eq!(form.submission_id(), &id);
        assert_eq!(form.draft().personal.first_name, "Ada");
        assert_eq!(coordinator.banner(), Some("Database unavailable"));
        assert!(coordinator.can_submit());

        // The retry reuses the same ID and succeeds
        let outcome = coordinator.submit(&mut form).await.unwrap();
        assert!(outcome.is_created());
        assert_eq!(backend.created.lock().unwrap().as_slice(), &[id.clone(), id]);
        assert!(coordinator.banner().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_preempts_call() {
        struct Hanging;

        #[async_trait]
        impl ValidationGateway for Hanging {
            async fn validate(&self, _: &Submission<'_>) -> Result<ValidationResult> {
                std::future::pending().await
            }
        }

        let backend = Arc::new(FakeBackend::default());
        let session = signed_in(Role::Staff);
        let mut coordinator =
            SubmissionCoordinator::new(Arc::new(Hanging), backend.clone(), backend, session.clone());
        let mut form = filled_form();
        let id = form.submission_id().clone();

        let expire = async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            session.expire();
        };
        let (result, _) = tokio::join!(coordinator.submit(&mut form), expire);

        assert!(result.unwrap_err().is_auth_expired());
        assert!(coordinator.banner().is_none());
        assert_eq!(coordinator.state(), SubmissionState::Idle);
        assert_eq!(form.submission_id(), &id);
    }

    #[tokio::test]
    async fn test_upload_appends_document() {
        let backend = Arc::new(FakeBackend::default());
        let mut coordinator = coordinator(backend, signed_in(Role::Staff));
        let mut form = filled_form();
        let file = DocumentFile::new("id.pdf", b"%PDF".to_vec()).unwrap();

        coordinator
            .attach_upload(&mut form, &file, DocumentType::Id)
            .await
            .unwrap();
        assert_eq!(form.draft().documents.len(), 1);
        assert_eq!(
            form.draft().documents[0].url,
            "https://files.example.com/id.pdf"
        );
        assert_eq!(coordinator.state(), SubmissionState::Idle);
    }
}
