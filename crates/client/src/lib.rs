//! # PA Client
//!
//! HTTP implementations of the workflow's service traits.
//!
//! - [`HttpExtractionService`] posts the document as multipart form data and decodes the
//!   extraction response
//! - [`HttpSubmissionService`] posts the patient form as JSON
//!
//! Requests carry no timeout; a slow service keeps the workflow busy until it answers or the
//! controller's abort handle is cancelled.

use async_trait::async_trait;
use pa_api_shared::{ExtractionResponse, SUBMISSIONS_PATH, UPLOAD_FILE_FIELD, UPLOAD_PATH};
use pa_core::{
    ClientConfig, DocumentUpload, ExtractionService, PatientForm, ServiceError, SubmissionService,
};
use reqwest::multipart::{Form, Part};
use tracing::instrument;

fn transport(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(err.to_string())
}

fn ensure_success(resp: &reqwest::Response) -> Result<(), ServiceError> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ServiceError::Status(status.as_u16()))
    }
}

/// Extraction service reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpExtractionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExtractionService {
    pub fn new(client: reqwest::Client, cfg: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", cfg.extraction_base_url(), UPLOAD_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    #[instrument(name = "extraction_upload", skip(self, document), fields(endpoint = %self.endpoint, file = document.file_name()))]
    async fn extract(&self, document: &DocumentUpload) -> Result<ExtractionResponse, ServiceError> {
        let part = Part::bytes(document.bytes().to_vec())
            .file_name(document.file_name().to_string())
            .mime_str(document.declared_type())
            .map_err(transport)?;
        let form = Form::new().part(UPLOAD_FILE_FIELD, part);

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(&resp)?;

        let response = resp
            .json::<ExtractionResponse>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        tracing::debug!("extraction response decoded");
        Ok(response)
    }
}

/// Submission service reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpSubmissionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionService {
    pub fn new(client: reqwest::Client, cfg: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", cfg.submission_base_url(), SUBMISSIONS_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionService {
    #[instrument(name = "form_submission", skip(self, form), fields(endpoint = %self.endpoint))]
    async fn submit(&self, form: &PatientForm) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(form)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(&resp)
    }
}

/// Builds the shared HTTP client.
///
/// # Errors
///
/// Returns `ServiceError::Transport` if the TLS backend cannot be initialised.
pub fn http_client() -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .user_agent(concat!("pa-client/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(transport)
}
