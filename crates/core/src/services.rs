//! Seams to the external services.
//!
//! The workflow only knows these traits. `pa-client` implements them over HTTP; tests use
//! in-process fakes.

use crate::document::DocumentUpload;
use crate::error::ServiceError;
use crate::form::PatientForm;
use async_trait::async_trait;
use pa_api_shared::ExtractionResponse;

/// Reads a document and returns the structured fields found in it.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, document: &DocumentUpload) -> Result<ExtractionResponse, ServiceError>;
}

/// Accepts a completed patient form.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, form: &PatientForm) -> Result<(), ServiceError>;
}
