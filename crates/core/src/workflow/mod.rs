//! Orchestration of one workflow instance.
//!
//! ```text
//! Upload ──select_file──▶ Upload ──upload()──▶ Form ──edits──▶ Form ──submit()──▶ Upload
//!            (type check)           (extract, arm guard)          (validate, delay, submit,
//!                                                                    disarm guard)
//! ```
//!
//! The controller owns the session, the current step and the transient status. Async
//! operations take `&mut self`, so the borrow checker keeps one instance from having two requests
//! in flight; there is no runtime "ignored" path. Each request gets its own cancellation token,
//! reachable through an [`AbortHandle`]; a cancelled request's late response is dropped without
//! touching the workflow.

pub mod form_step;
pub mod upload_step;

use crate::config::ClientConfig;
use crate::constants::{SUBMISSION_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE};
use crate::document::DocumentUpload;
use crate::error::{Phase, WorkflowError};
use crate::extraction::ExtractionAdapter;
use crate::form::FormHandoff;
use crate::guard::WorkflowSession;
use crate::services::{ExtractionService, SubmissionService};
use form_step::{FormStep, Mount};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use upload_step::UploadStep;

/// The two pages of the workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Upload,
    Form,
}

/// Transient status driving the loading indicator and disabled controls.
///
/// A failed request returns to `Idle`; the failure itself is shown through the step's `error()`
/// message and the returned [`WorkflowError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Uploading,
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The document was read and the form step is showing.
    Extracted,
    NoFileSelected,
    /// The abort handle fired before the response arrived.
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form was accepted and the upload step is showing again.
    Submitted,
    Abandoned,
}

#[derive(Debug)]
enum Screen {
    Upload(UploadStep),
    Form(FormStep),
}

/// Cancels the request in flight, if any.
///
/// Handles can be taken before a request starts and kept across requests. Aborting while the
/// controller is idle does nothing.
#[derive(Clone, Debug)]
pub struct AbortHandle {
    request: watch::Receiver<Option<CancellationToken>>,
}

impl AbortHandle {
    /// Returns whether a pending request was abandoned.
    pub fn abort(&self) -> bool {
        match self.request.borrow().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// One outstanding request: publishes a busy status and a fresh cancellation token, and restores
/// `Idle` with no token when dropped, whichever way the request ends.
struct Busy<'a> {
    status: &'a watch::Sender<Status>,
    request: &'a watch::Sender<Option<CancellationToken>>,
    cancel: CancellationToken,
}

impl<'a> Busy<'a> {
    fn enter(
        status: &'a watch::Sender<Status>,
        request: &'a watch::Sender<Option<CancellationToken>>,
        busy: Status,
    ) -> Self {
        let cancel = CancellationToken::new();
        request.send_replace(Some(cancel.clone()));
        status.send_replace(busy);
        Self {
            status,
            request,
            cancel,
        }
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.request.send_replace(None);
        self.status.send_replace(Status::Idle);
    }
}

pub struct WorkflowController {
    cfg: Arc<ClientConfig>,
    extraction: Arc<dyn ExtractionService>,
    submission: Arc<dyn SubmissionService>,
    session: WorkflowSession,
    screen: Screen,
    status: watch::Sender<Status>,
    request: watch::Sender<Option<CancellationToken>>,
}

impl WorkflowController {
    /// Starts a workflow instance on the upload step.
    pub fn new(
        cfg: Arc<ClientConfig>,
        extraction: Arc<dyn ExtractionService>,
        submission: Arc<dyn SubmissionService>,
    ) -> Self {
        let mut session = WorkflowSession::new();
        let screen = Screen::Upload(UploadStep::enter(&mut session));
        let (status, _) = watch::channel(Status::Idle);
        let (request, _) = watch::channel(None);

        Self {
            cfg,
            extraction,
            submission,
            session,
            screen,
            status,
            request,
        }
    }

    pub fn route(&self) -> Route {
        match self.screen {
            Screen::Upload(_) => Route::Upload,
            Screen::Form(_) => Route::Form,
        }
    }

    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    /// Receiver that observes status changes, for rendering a loading indicator.
    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn upload_step(&self) -> Option<&UploadStep> {
        match &self.screen {
            Screen::Upload(step) => Some(step),
            Screen::Form(_) => None,
        }
    }

    pub fn form_step(&self) -> Option<&FormStep> {
        match &self.screen {
            Screen::Form(step) => Some(step),
            Screen::Upload(_) => None,
        }
    }

    pub fn form_step_mut(&mut self) -> Option<&mut FormStep> {
        match &mut self.screen {
            Screen::Form(step) => Some(step),
            Screen::Upload(_) => None,
        }
    }

    /// Handle that abandons whichever request is pending when it is used.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            request: self.request.subscribe(),
        }
    }

    /// Shows the upload step, disarming the guard.
    pub fn open_upload(&mut self) {
        self.navigate(Route::Upload, None);
    }

    /// Requests the form step directly. Without a completed upload this lands on the upload
    /// step instead. Returns the route actually shown.
    pub fn open_form(&mut self, handoff: Option<FormHandoff>) -> Route {
        self.navigate(Route::Form, handoff);
        self.route()
    }

    /// Selects the document to upload.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::InputRejected`] if the declared type is not the accepted one
    /// - [`WorkflowError::NotOnStep`] outside the upload step
    pub fn select_file(&mut self, document: DocumentUpload) -> Result<(), WorkflowError> {
        match &mut self.screen {
            Screen::Upload(step) => step.select_file(document, self.cfg.accepted_document_type()),
            Screen::Form(_) => Err(WorkflowError::NotOnStep(Route::Upload)),
        }
    }

    /// Sends the selected document to the extraction service and, on success, moves to the
    /// form step with the extracted fields.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::TransportFailure`] if the service call fails; the upload step stays
    ///   in place showing the upload error
    /// - [`WorkflowError::NotOnStep`] outside the upload step
    pub async fn upload(&mut self) -> Result<UploadOutcome, WorkflowError> {
        let Screen::Upload(step) = &self.screen else {
            return Err(WorkflowError::NotOnStep(Route::Upload));
        };
        let Some(document) = step.selected_file().cloned() else {
            return Ok(UploadOutcome::NoFileSelected);
        };

        let extraction = Arc::clone(&self.extraction);
        let busy = Busy::enter(&self.status, &self.request, Status::Uploading);
        tracing::info!(file = document.file_name(), "uploading document for extraction");
        let result = tokio::select! {
            biased;
            _ = busy.cancel.cancelled() => None,
            result = extraction.extract(&document) => Some(result),
        };
        drop(busy);

        match result {
            None => {
                tracing::info!(phase = %Phase::Upload, "request abandoned, response ignored");
                Ok(UploadOutcome::Abandoned)
            }
            Some(Err(source)) => {
                tracing::warn!(error = %source, "extraction failed");
                if let Screen::Upload(step) = &mut self.screen {
                    step.set_error(UPLOAD_FAILED_MESSAGE);
                }
                Err(WorkflowError::TransportFailure {
                    phase: Phase::Upload,
                    source,
                })
            }
            Some(Ok(response)) => {
                tracing::info!(
                    diagnosis_codes = response.relevant_diagnosis.len(),
                    procedure_codes = response.relevant_procedure.len(),
                    "extraction succeeded"
                );
                let handoff = ExtractionAdapter::handoff(response);
                self.session.guard_mut().arm();
                self.navigate(Route::Form, Some(handoff));
                Ok(UploadOutcome::Extracted)
            }
        }
    }

    /// Validates the form and hands it to the submission service.
    ///
    /// The request starts after the configured submit delay. On success the form is cleared,
    /// the guard disarmed and the upload step shown.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::ValidationFailed`] or [`WorkflowError::FormatRejected`]; no request
    ///   is made
    /// - [`WorkflowError::TransportFailure`]; the form is left as it was for a retry
    /// - [`WorkflowError::NotOnStep`] outside the form step
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        let Screen::Form(step) = &mut self.screen else {
            return Err(WorkflowError::NotOnStep(Route::Form));
        };
        step.check_submission()?;
        let form = step.form().clone();

        let delay = self.cfg.submit_delay();
        let submission = Arc::clone(&self.submission);
        let busy = Busy::enter(&self.status, &self.request, Status::Submitting);
        let result = tokio::select! {
            biased;
            _ = busy.cancel.cancelled() => None,
            result = async {
                tokio::time::sleep(delay).await;
                tracing::info!(
                    procedure_codes = form.procedure_codes.len(),
                    diagnosis_codes = form.diagnosis_codes.len(),
                    "submitting form"
                );
                submission.submit(&form).await
            } => Some(result),
        };
        drop(busy);

        match result {
            None => {
                tracing::info!(phase = %Phase::Submission, "request abandoned, response ignored");
                Ok(SubmitOutcome::Abandoned)
            }
            Some(Err(source)) => {
                tracing::warn!(error = %source, "submission failed");
                if let Screen::Form(step) = &mut self.screen {
                    step.set_error(SUBMISSION_FAILED_MESSAGE);
                }
                Err(WorkflowError::TransportFailure {
                    phase: Phase::Submission,
                    source,
                })
            }
            Some(Ok(())) => {
                tracing::info!("submission accepted");
                if let Screen::Form(step) = &mut self.screen {
                    step.reset();
                }
                self.session.guard_mut().disarm();
                self.navigate(Route::Upload, None);
                Ok(SubmitOutcome::Submitted)
            }
        }
    }

    fn navigate(&mut self, route: Route, handoff: Option<FormHandoff>) {
        self.screen = match route {
            Route::Upload => Screen::Upload(UploadStep::enter(&mut self.session)),
            Route::Form => match FormStep::mount(self.session.guard(), handoff) {
                Mount::Rendered(step) => Screen::Form(step),
                Mount::Redirected => {
                    tracing::warn!("form requested without a completed upload, redirecting");
                    Screen::Upload(UploadStep::enter(&mut self.session))
                }
            },
        };
        tracing::debug!(route = ?self.route(), "navigated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeKind;
    use crate::constants::{
        GENERAL_CODES_NOTICE, INVALID_FILE_MESSAGE, MISSING_CODES_MESSAGE, PDF_MEDIA_TYPE,
    };
    use crate::error::{ServiceError, ValidationError};
    use crate::form::PatientForm;
    use crate::guard::GuardState;
    use async_trait::async_trait;
    use pa_api_shared::{CodeMetadata, ExtractedPatient, ExtractionResponse, RelevantCode};
    use pa_types::CodeId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    enum Behaviour {
        Respond(ExtractionResponse),
        FailStatus(u16),
        Hang,
    }

    struct FakeExtraction {
        behaviour: Behaviour,
        calls: AtomicUsize,
        probe: Mutex<Option<watch::Receiver<Status>>>,
        seen: Mutex<Vec<Status>>,
    }

    impl FakeExtraction {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: AtomicUsize::new(0),
                probe: Mutex::new(None),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExtractionService for FakeExtraction {
        async fn extract(
            &self,
            _document: &DocumentUpload,
        ) -> Result<ExtractionResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(rx) = self.probe.lock().unwrap().as_ref() {
                self.seen.lock().unwrap().push(*rx.borrow());
            }
            match &self.behaviour {
                Behaviour::Respond(response) => Ok(response.clone()),
                Behaviour::FailStatus(code) => Err(ServiceError::Status(*code)),
                Behaviour::Hang => std::future::pending().await,
            }
        }
    }

    struct FakeSubmission {
        fail: bool,
        hang: bool,
        received: Mutex<Vec<PatientForm>>,
    }

    impl FakeSubmission {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                hang: false,
                received: Mutex::new(Vec::new()),
            })
        }

        fn hanging() -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                hang: true,
                received: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SubmissionService for FakeSubmission {
        async fn submit(&self, form: &PatientForm) -> Result<(), ServiceError> {
            self.received.lock().unwrap().push(form.clone());
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(ServiceError::Status(500));
            }
            Ok(())
        }
    }

    fn relevant(id: &str) -> RelevantCode {
        RelevantCode {
            id: id.into(),
            reason: format!("reason {id}"),
            annotation: format!("annotation {id}"),
            metadata: CodeMetadata::default(),
        }
    }

    fn response(excel: bool) -> ExtractionResponse {
        ExtractionResponse {
            data: ExtractedPatient {
                patient_name: "Mary Jane Watson".into(),
                date_of_birth: "1985-06-01".into(),
            },
            relevant_diagnosis: vec![relevant("E11.9"), relevant("E11.9")],
            relevant_procedure: vec![relevant("99213")],
            excel,
        }
    }

    fn config(delay: Duration) -> Arc<ClientConfig> {
        Arc::new(
            ClientConfig::new("http://extract.test", "http://submit.test", PDF_MEDIA_TYPE, delay)
                .expect("valid config"),
        )
    }

    fn controller(
        extraction: &Arc<FakeExtraction>,
        submission: &Arc<FakeSubmission>,
        delay: Duration,
    ) -> WorkflowController {
        WorkflowController::new(config(delay), extraction.clone(), submission.clone())
    }

    fn pdf() -> DocumentUpload {
        DocumentUpload::new("note.pdf", PDF_MEDIA_TYPE, b"%PDF-1.7".to_vec()).unwrap()
    }

    async fn on_form(controller: &mut WorkflowController) {
        controller.select_file(pdf()).expect("pdf accepted");
        let outcome = controller.upload().await.expect("upload succeeds");
        assert_eq!(outcome, UploadOutcome::Extracted);
    }

    #[tokio::test]
    async fn starts_idle_on_upload_step_without_upload() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let controller = controller(&extraction, &submission, Duration::ZERO);

        assert_eq!(controller.route(), Route::Upload);
        assert_eq!(controller.status(), Status::Idle);
        assert_eq!(controller.session().guard().state(), GuardState::NoUpload);
    }

    #[tokio::test]
    async fn rejected_file_never_reaches_the_service() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);

        for declared in ["image/png", "text/plain", "", "application/PDF"] {
            let doc = DocumentUpload::new("scan", declared, vec![1]).unwrap();
            let err = controller.select_file(doc).unwrap_err();
            assert!(matches!(err, WorkflowError::InputRejected { .. }));
            assert_eq!(err.user_message(), INVALID_FILE_MESSAGE);
        }

        assert_eq!(controller.upload().await.unwrap(), UploadOutcome::NoFileSelected);
        assert_eq!(extraction.calls(), 0);
        assert_eq!(
            controller.upload_step().and_then(UploadStep::error),
            Some(INVALID_FILE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn successful_upload_prefills_form_and_arms_guard() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(true)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);

        on_form(&mut controller).await;

        assert_eq!(extraction.calls(), 1);
        assert_eq!(controller.route(), Route::Form);
        assert!(controller.session().guard().permits_form());
        assert_eq!(controller.status(), Status::Idle);

        let step = controller.form_step().expect("form step");
        assert_eq!(step.form().first_name, "Mary");
        assert_eq!(step.form().last_name, "Jane Watson");
        assert_eq!(step.form().date_of_birth, "1985-06-01");
        assert_eq!(step.form().diagnosis_codes.len(), 2);
        assert_eq!(step.form().procedure_codes.len(), 1);
        assert_eq!(step.general_code_notice(), Some(GENERAL_CODES_NOTICE));
        assert!(step.details().is_none());
    }

    #[tokio::test]
    async fn status_shows_uploading_while_request_is_pending() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        *extraction.probe.lock().unwrap() = Some(controller.subscribe_status());

        on_form(&mut controller).await;

        assert_eq!(*extraction.seen.lock().unwrap(), vec![Status::Uploading]);
        assert_eq!(controller.status(), Status::Idle);
    }

    #[tokio::test]
    async fn failed_upload_stays_on_upload_step() {
        let extraction = FakeExtraction::new(Behaviour::FailStatus(502));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        controller.select_file(pdf()).unwrap();

        let err = controller.upload().await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::TransportFailure {
                phase: Phase::Upload,
                source: ServiceError::Status(502)
            }
        ));
        assert_eq!(err.user_message(), UPLOAD_FAILED_MESSAGE);
        assert_eq!(controller.route(), Route::Upload);
        assert_eq!(controller.status(), Status::Idle);
        assert!(!controller.session().guard().permits_form());
        assert_eq!(
            controller.upload_step().and_then(UploadStep::error),
            Some(UPLOAD_FAILED_MESSAGE)
        );
        assert!(controller.upload_step().unwrap().selected_file().is_some());
    }

    #[tokio::test]
    async fn direct_form_access_redirects_to_upload() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);

        let shown = controller.open_form(Some(ExtractionAdapter::handoff(response(false))));

        assert_eq!(shown, Route::Upload);
        assert!(controller.form_step().is_none());
    }

    #[tokio::test]
    async fn leaving_the_form_disarms_guard() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        on_form(&mut controller).await;

        controller.open_upload();

        assert!(!controller.session().guard().permits_form());
        assert_eq!(controller.open_form(None), Route::Upload);
    }

    #[tokio::test]
    async fn incomplete_form_is_not_submitted() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        on_form(&mut controller).await;
        let step = controller.form_step_mut().unwrap();
        step.remove_code(CodeKind::Procedure, &CodeId::from_code("99213"));

        let err = controller.submit().await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::ValidationFailed(ValidationError::MissingCodes)
        ));
        assert_eq!(submission.calls(), 0);
        assert_eq!(controller.route(), Route::Form);
        assert_eq!(
            controller.form_step().and_then(FormStep::error),
            Some(MISSING_CODES_MESSAGE)
        );
    }

    #[tokio::test]
    async fn malformed_procedure_code_shows_notice_without_request() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        on_form(&mut controller).await;
        let step = controller.form_step_mut().unwrap();
        let id = step.add_code(CodeKind::Procedure);
        step.update_code(CodeKind::Procedure, &id, "A234B");

        let err = controller.submit().await.unwrap_err();

        match err {
            WorkflowError::FormatRejected { invalid } => assert_eq!(invalid, vec![id]),
            other => panic!("expected FormatRejected, got {other:?}"),
        }
        assert_eq!(submission.calls(), 0);
        assert!(controller.form_step().unwrap().format_notice().is_some());
        assert!(controller.session().guard().permits_form());
    }

    #[tokio::test(start_paused = true)]
    async fn successful_submission_resets_and_returns_to_upload() {
        let delay = Duration::from_millis(1000);
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, delay);
        on_form(&mut controller).await;
        let step = controller.form_step_mut().unwrap();
        let id = step.add_code(CodeKind::Procedure);
        step.update_code(CodeKind::Procedure, &id, "20610");

        let started = tokio::time::Instant::now();
        let outcome = controller.submit().await.expect("submission succeeds");

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert!(started.elapsed() >= delay);
        assert_eq!(submission.calls(), 1);
        let sent = submission.received.lock().unwrap()[0].clone();
        assert_eq!(sent.first_name, "Mary");
        assert_eq!(sent.procedure_codes.len(), 2);
        assert_eq!(sent.procedure_codes.as_slice()[1].value, "20610");

        assert_eq!(controller.route(), Route::Upload);
        assert_eq!(controller.status(), Status::Idle);
        assert!(!controller.session().guard().permits_form());
        assert_eq!(controller.open_form(None), Route::Upload);
    }

    #[tokio::test]
    async fn failed_submission_keeps_form_for_retry() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(true);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        on_form(&mut controller).await;
        let before = controller.form_step().unwrap().form().clone();

        let err = controller.submit().await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::TransportFailure {
                phase: Phase::Submission,
                ..
            }
        ));
        assert_eq!(submission.calls(), 1);
        assert_eq!(controller.route(), Route::Form);
        assert_eq!(controller.status(), Status::Idle);
        let step = controller.form_step().unwrap();
        assert_eq!(step.form(), &before);
        assert_eq!(step.error(), Some(SUBMISSION_FAILED_MESSAGE));

        assert!(controller.submit().await.is_err());
        assert_eq!(submission.calls(), 2);
    }

    #[tokio::test]
    async fn cancelled_upload_is_inert() {
        let extraction = FakeExtraction::new(Behaviour::Hang);
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        controller.select_file(pdf()).unwrap();
        let handle = controller.abort_handle();
        tokio::spawn(async move {
            while !handle.abort() {
                tokio::task::yield_now().await;
            }
        });

        let outcome = controller.upload().await.expect("abandoned, not failed");

        assert_eq!(outcome, UploadOutcome::Abandoned);
        assert_eq!(extraction.calls(), 1);
        assert_eq!(controller.route(), Route::Upload);
        assert_eq!(controller.status(), Status::Idle);
        assert!(!controller.session().guard().permits_form());
        assert!(!controller.abort_handle().abort());
    }

    #[tokio::test]
    async fn abort_while_idle_does_not_touch_the_next_upload() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        controller.select_file(pdf()).unwrap();

        assert!(!controller.abort_handle().abort());
        let outcome = controller.upload().await.unwrap();

        assert_eq!(outcome, UploadOutcome::Extracted);
        assert_eq!(extraction.calls(), 1);
        assert_eq!(controller.route(), Route::Form);
    }

    #[tokio::test]
    async fn handle_kept_across_requests_only_reaches_the_pending_one() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);
        let handle = controller.abort_handle();

        on_form(&mut controller).await;
        assert!(!handle.abort());
        let outcome = controller.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(submission.calls(), 1);
        assert_eq!(controller.route(), Route::Upload);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_submission_leaves_form_untouched() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::hanging();
        let mut controller = controller(&extraction, &submission, Duration::from_millis(50));
        on_form(&mut controller).await;
        let before = controller.form_step().unwrap().form().clone();
        let handle = controller.abort_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            handle.abort();
        });

        let outcome = controller.submit().await.expect("abandoned, not failed");

        assert_eq!(outcome, SubmitOutcome::Abandoned);
        assert_eq!(submission.calls(), 1);
        assert_eq!(controller.route(), Route::Form);
        assert_eq!(controller.form_step().unwrap().form(), &before);
        assert!(controller.session().guard().permits_form());
        assert_eq!(controller.status(), Status::Idle);
    }

    #[tokio::test]
    async fn steps_refuse_operations_of_the_other_step() {
        let extraction = FakeExtraction::new(Behaviour::Respond(response(false)));
        let submission = FakeSubmission::new(false);
        let mut controller = controller(&extraction, &submission, Duration::ZERO);

        assert!(matches!(
            controller.submit().await,
            Err(WorkflowError::NotOnStep(Route::Form))
        ));

        on_form(&mut controller).await;
        assert!(matches!(
            controller.select_file(pdf()),
            Err(WorkflowError::NotOnStep(Route::Upload))
        ));
        assert!(matches!(
            controller.upload().await,
            Err(WorkflowError::NotOnStep(Route::Upload))
        ));
    }
}
