//! The upload step: file selection and its local type check.

use crate::constants::INVALID_FILE_MESSAGE;
use crate::document::DocumentUpload;
use crate::error::WorkflowError;
use crate::guard::WorkflowSession;
use pa_types::NonEmptyText;

#[derive(Debug, Default)]
pub struct UploadStep {
    selected: Option<DocumentUpload>,
    error: Option<&'static str>,
}

impl UploadStep {
    /// Entering the upload step always disarms the navigation guard.
    pub(crate) fn enter(session: &mut WorkflowSession) -> Self {
        session.guard_mut().disarm();
        Self::default()
    }

    /// Selects `document` if its declared type is `accepted`.
    ///
    /// A rejected document leaves the previous selection in place.
    pub(crate) fn select_file(
        &mut self,
        document: DocumentUpload,
        accepted: &NonEmptyText,
    ) -> Result<(), WorkflowError> {
        if !document.is_of_type(accepted) {
            tracing::warn!(
                file = document.file_name(),
                declared_type = document.declared_type(),
                "rejected document with unaccepted type"
            );
            self.error = Some(INVALID_FILE_MESSAGE);
            return Err(WorkflowError::InputRejected {
                declared_type: document.declared_type().to_string(),
            });
        }

        self.selected = Some(document);
        self.error = None;
        Ok(())
    }

    pub fn selected_file(&self) -> Option<&DocumentUpload> {
        self.selected.as_ref()
    }

    /// Message currently shown above the upload control.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub(crate) fn set_error(&mut self, message: &'static str) {
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PDF_MEDIA_TYPE;

    fn pdf_type() -> NonEmptyText {
        NonEmptyText::new(PDF_MEDIA_TYPE).unwrap()
    }

    #[test]
    fn entering_disarms_guard() {
        let mut session = WorkflowSession::new();
        session.guard_mut().arm();

        let step = UploadStep::enter(&mut session);

        assert!(!session.guard().permits_form());
        assert!(step.selected_file().is_none());
        assert!(step.error().is_none());
    }

    #[test]
    fn rejected_file_keeps_previous_selection() {
        let mut session = WorkflowSession::new();
        let mut step = UploadStep::enter(&mut session);
        let pdf = DocumentUpload::new("note.pdf", PDF_MEDIA_TYPE, b"%PDF".to_vec()).unwrap();
        step.select_file(pdf, &pdf_type()).expect("pdf accepted");

        let png = DocumentUpload::new("scan.png", "image/png", vec![0x89]).unwrap();
        let err = step.select_file(png, &pdf_type()).unwrap_err();

        assert!(matches!(err, WorkflowError::InputRejected { declared_type } if declared_type == "image/png"));
        assert_eq!(step.error(), Some(INVALID_FILE_MESSAGE));
        assert_eq!(step.selected_file().map(DocumentUpload::file_name), Some("note.pdf"));
    }

    #[test]
    fn accepted_file_clears_error() {
        let mut session = WorkflowSession::new();
        let mut step = UploadStep::enter(&mut session);
        let txt = DocumentUpload::new("note.txt", "text/plain", vec![]).unwrap();
        assert!(step.select_file(txt, &pdf_type()).is_err());

        let pdf = DocumentUpload::new("note.pdf", PDF_MEDIA_TYPE, vec![]).unwrap();
        step.select_file(pdf, &pdf_type()).expect("pdf accepted");

        assert!(step.error().is_none());
    }

    #[test]
    fn empty_declared_type_is_rejected() {
        let mut session = WorkflowSession::new();
        let mut step = UploadStep::enter(&mut session);
        let unknown = DocumentUpload::new("blob", "", vec![1, 2, 3]).unwrap();

        assert!(step.select_file(unknown, &pdf_type()).is_err());
        assert!(step.selected_file().is_none());
    }
}
