//! # API Shared
//!
//! Wire definitions shared by the workflow core and the HTTP client.
//!
//! Contains:
//! - The JSON shapes returned by the extraction service (`wire` module)
//! - Endpoint paths and multipart field names both sides agree on
//!
//! The submission body is the serialised patient form and lives with the form in `pa-core`.

pub mod wire;

pub use wire::{CodeMetadata, ExtractedPatient, ExtractionResponse, RelevantCode};

/// Path of the extraction endpoint, relative to the extraction service base URL.
pub const UPLOAD_PATH: &str = "/api/upload";

/// Path of the submission endpoint, relative to the submission service base URL.
pub const SUBMISSIONS_PATH: &str = "/api/submissions";

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FILE_FIELD: &str = "file";
