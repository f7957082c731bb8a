use crate::constants::{
    BLANK_CODES_MESSAGE, INVALID_FILE_MESSAGE, INVALID_FORMAT_MESSAGE, MISSING_CODES_MESSAGE,
    SUBMISSION_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
use crate::workflow::Route;
use pa_types::CodeId;

/// Errors raised while building core values (configuration, documents).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read document: {0}")]
    DocumentRead(std::io::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Failure reported by an external service collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Blocking form problems, shown inline above the form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one procedure code and one diagnosis code required")]
    MissingCodes,
    #[error("all codes must be filled out")]
    BlankCodes,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingCodes => MISSING_CODES_MESSAGE,
            ValidationError::BlankCodes => BLANK_CODES_MESSAGE,
        }
    }
}

/// Which network call a [`WorkflowError::TransportFailure`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Submission,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Upload => f.write_str("upload"),
            Phase::Submission => f.write_str("submission"),
        }
    }
}

/// Every way a workflow step can refuse or fail. None of them is fatal: the workflow is back in
/// an interactive state by the time one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The selected file does not have the accepted declared type. No request was made.
    #[error("document type '{declared_type}' is not accepted")]
    InputRejected { declared_type: String },

    #[error("{phase} request failed: {source}")]
    TransportFailure {
        phase: Phase,
        #[source]
        source: ServiceError,
    },

    #[error("form validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Procedure codes with the wrong shape. Shown as a dismissable notice.
    #[error("{} procedure code(s) are incorrectly formatted", invalid.len())]
    FormatRejected { invalid: Vec<CodeId> },

    #[error("operation requires the {0:?} step")]
    NotOnStep(Route),
}

impl WorkflowError {
    /// Text shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            WorkflowError::InputRejected { .. } => INVALID_FILE_MESSAGE,
            WorkflowError::TransportFailure {
                phase: Phase::Upload,
                ..
            } => UPLOAD_FAILED_MESSAGE,
            WorkflowError::TransportFailure {
                phase: Phase::Submission,
                ..
            } => SUBMISSION_FAILED_MESSAGE,
            WorkflowError::ValidationFailed(e) => e.user_message(),
            WorkflowError::FormatRejected { .. } => INVALID_FORMAT_MESSAGE,
            WorkflowError::NotOnStep(_) => "This action is not available on the current page.",
        }
    }
}
