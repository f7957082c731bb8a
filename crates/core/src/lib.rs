//! # PA Core
//!
//! Client-side workflow for prior-authorisation requests:
//! - Upload a scanned document and let the extraction service read it
//! - Prefill an editable patient form from the extracted fields
//! - Edit procedure and diagnosis code lists
//! - Validate and hand the form to the submission service
//!
//! **No transport concerns**: the extraction and submission services are reached through the
//! traits in [`services`]; the HTTP implementations live in `pa-client`.

pub mod code;
pub mod code_list;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod extraction;
pub mod form;
pub mod guard;
pub mod services;
pub mod validation;
pub mod workflow;

pub use code::{Code, CodeKind};
pub use code_list::CodeList;
pub use config::ClientConfig;
pub use document::DocumentUpload;
pub use error::{CoreError, CoreResult, Phase, ServiceError, ValidationError, WorkflowError};
pub use extraction::ExtractionAdapter;
pub use form::{FormHandoff, IdentityField, PatientForm};
pub use guard::{GuardState, NavigationGuard, WorkflowSession};
pub use services::{ExtractionService, SubmissionService};
pub use validation::SubmissionValidator;
pub use workflow::{
    form_step::{CodeDetails, FormStep, Mount},
    upload_step::UploadStep,
    AbortHandle, Route, Status, SubmitOutcome, UploadOutcome, WorkflowController,
};

pub use pa_api_shared::{ExtractionResponse, RelevantCode};
pub use pa_types::{CodeId, NonEmptyText};
