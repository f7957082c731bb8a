//! Client runtime configuration.
//!
//! Configuration is resolved once at process start-up and then passed into the workflow and the
//! service clients. Nothing in this crate reads environment variables while a workflow runs.

use crate::constants::DEFAULT_SUBMIT_DELAY_MS;
use crate::{CoreError, CoreResult};
use pa_types::NonEmptyText;
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    extraction_base_url: NonEmptyText,
    submission_base_url: NonEmptyText,
    accepted_document_type: NonEmptyText,
    submit_delay: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// Base URLs are stored without a trailing slash so endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if a URL or the accepted document type is blank, or if a
    /// URL does not use the `http` or `https` scheme.
    pub fn new(
        extraction_base_url: impl AsRef<str>,
        submission_base_url: impl AsRef<str>,
        accepted_document_type: impl AsRef<str>,
        submit_delay: Duration,
    ) -> CoreResult<Self> {
        Ok(Self {
            extraction_base_url: base_url("extraction", extraction_base_url.as_ref())?,
            submission_base_url: base_url("submission", submission_base_url.as_ref())?,
            accepted_document_type: NonEmptyText::new(accepted_document_type).map_err(|_| {
                CoreError::InvalidInput("accepted document type cannot be empty".into())
            })?,
            submit_delay,
        })
    }

    pub fn extraction_base_url(&self) -> &str {
        self.extraction_base_url.as_str()
    }

    pub fn submission_base_url(&self) -> &str {
        self.submission_base_url.as_str()
    }

    pub fn accepted_document_type(&self) -> &NonEmptyText {
        &self.accepted_document_type
    }

    /// Minimum time between a passed validation and the submission request.
    pub fn submit_delay(&self) -> Duration {
        self.submit_delay
    }
}

fn base_url(service: &str, value: &str) -> CoreResult<NonEmptyText> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(CoreError::InvalidInput(format!(
            "{service} base URL must start with http:// or https://, got: '{value}'"
        )));
    }
    NonEmptyText::new(trimmed)
        .map_err(|_| CoreError::InvalidInput(format!("{service} base URL cannot be empty")))
}

/// Parse the submit delay from an optional millisecond string.
///
/// If `value` is `None` or empty/whitespace, returns the default delay.
pub fn submit_delay_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let millis = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            CoreError::InvalidInput(format!("submit delay must be whole milliseconds, got: '{v}'"))
        })?,
        None => DEFAULT_SUBMIT_DELAY_MS,
    };

    Ok(Duration::from_millis(millis))
}
