//! The form step: editable patient form, notices and the code details panel.

use crate::code::CodeKind;
use crate::constants::{GENERAL_CODES_NOTICE, INVALID_FORMAT_MESSAGE};
use crate::error::WorkflowError;
use crate::extraction::ExtractionAdapter;
use crate::form::{FormHandoff, IdentityField, PatientForm};
use crate::guard::NavigationGuard;
use crate::validation::SubmissionValidator;
use pa_types::CodeId;

/// Result of mounting the form step.
#[derive(Debug)]
pub enum Mount {
    Rendered(FormStep),
    /// No completed upload; the caller must show the upload step instead.
    Redirected,
}

/// What the details panel shows for the selected code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeDetails {
    pub kind: CodeKind,
    pub code: String,
    pub reason: Option<String>,
    pub annotation: Option<String>,
}

#[derive(Debug)]
pub struct FormStep {
    form: PatientForm,
    selected: Option<(CodeKind, CodeId)>,
    general_code_notice: bool,
    format_notice: bool,
    error: Option<&'static str>,
}

impl FormStep {
    /// Mounts the form step.
    ///
    /// The guard is consulted here and nowhere else: once mounted, the step stays usable for
    /// its whole lifetime. A missing payload mounts an empty form.
    pub fn mount(guard: &NavigationGuard, handoff: Option<FormHandoff>) -> Mount {
        if !guard.permits_form() {
            return Mount::Redirected;
        }

        let handoff = handoff.unwrap_or_default();
        let form = ExtractionAdapter::hydrate(&handoff);
        tracing::info!(
            procedure_codes = form.procedure_codes.len(),
            diagnosis_codes = form.diagnosis_codes.len(),
            general_codes = handoff.excel_used,
            "form step mounted"
        );

        Mount::Rendered(Self {
            form,
            selected: None,
            general_code_notice: handoff.excel_used,
            format_notice: false,
            error: None,
        })
    }

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn add_code(&mut self, kind: CodeKind) -> CodeId {
        self.form.add_code(kind)
    }

    pub fn remove_code(&mut self, kind: CodeKind, id: &CodeId) {
        self.form.remove_code(kind, id);
        if self.selected.as_ref() == Some(&(kind, id.clone())) {
            self.selected = None;
        }
    }

    pub fn update_code(&mut self, kind: CodeKind, id: &CodeId, value: impl Into<String>) {
        self.form.update_code(kind, id, value);
    }

    pub fn set_field(&mut self, field: IdentityField, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    /// Opens the details panel for a code. Returns `false` if no such code exists.
    pub fn select_code(&mut self, kind: CodeKind, id: &CodeId) -> bool {
        if self.form.codes(kind).get(id).is_none() {
            return false;
        }
        self.selected = Some((kind, id.clone()));
        true
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn details(&self) -> Option<CodeDetails> {
        let (kind, id) = self.selected.as_ref()?;
        let code = self.form.codes(*kind).get(id)?;
        Some(CodeDetails {
            kind: *kind,
            code: code.id.to_string(),
            reason: code.reason.clone(),
            annotation: code.annotation.clone(),
        })
    }

    /// Informational notice shown when procedure codes came from the general code table.
    pub fn general_code_notice(&self) -> Option<&'static str> {
        self.general_code_notice.then_some(GENERAL_CODES_NOTICE)
    }

    pub fn dismiss_general_code_notice(&mut self) {
        self.general_code_notice = false;
    }

    /// Modal shown after a submission attempt with malformed procedure codes.
    pub fn format_notice(&self) -> Option<&'static str> {
        self.format_notice.then_some(INVALID_FORMAT_MESSAGE)
    }

    pub fn dismiss_format_notice(&mut self) {
        self.format_notice = false;
    }

    /// Blocking message shown above the form.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Runs the submission rules and updates the visible messages accordingly.
    pub(crate) fn check_submission(&mut self) -> Result<(), WorkflowError> {
        match SubmissionValidator::validate(&self.form) {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(err @ WorkflowError::FormatRejected { .. }) => {
                tracing::info!(%err, "submission held back for code format");
                self.format_notice = true;
                Err(err)
            }
            Err(err) => {
                tracing::info!(%err, "submission held back by validation");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub(crate) fn set_error(&mut self, message: &'static str) {
        self.error = Some(message);
    }

    pub(crate) fn reset(&mut self) {
        self.form = PatientForm::default();
        self.selected = None;
    }
}
