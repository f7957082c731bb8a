//! Constants used throughout the PA core crate.
//!
//! User-facing messages are kept here so that every screen shows the same wording.

/// Media type accepted by the upload step unless configured otherwise.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Declared type used when a document's type cannot be determined.
pub const OCTET_STREAM_MEDIA_TYPE: &str = "application/octet-stream";

/// Default base URL of the extraction service.
pub const DEFAULT_EXTRACTION_URL: &str = "http://localhost:10000";

/// Default base URL of the submission service.
pub const DEFAULT_SUBMISSION_URL: &str = "http://localhost:5000";

/// Default minimum time the submission loading indicator stays visible, in milliseconds.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;

/// Required length of a procedure code.
pub const PROCEDURE_CODE_LEN: usize = 5;

/// Minimum number of digits in a procedure code.
pub const PROCEDURE_CODE_MIN_DIGITS: usize = 4;

pub const INVALID_FILE_MESSAGE: &str = "Please upload a valid PDF file.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading file";
pub const SUBMISSION_FAILED_MESSAGE: &str = "Error saving submission";
pub const MISSING_CODES_MESSAGE: &str =
    "Please provide at least one procedure code and one diagnosis code.";
pub const BLANK_CODES_MESSAGE: &str =
    "Please ensure all procedure and diagnosis codes are filled out.";
pub const INVALID_FORMAT_MESSAGE: &str = "Incorrectly formatted codes. Please try again.";
pub const GENERAL_CODES_NOTICE: &str =
    "Warning: Procedure Codes (If Any) Filled In Using General Codes Not Medical Guidelines";

/// Loading text shown while the extraction service works.
pub const UPLOADING_MESSAGE: &str = "Prior Authorization Form Being Generated...";

/// Loading text shown while the submission is in flight.
pub const SUBMITTING_MESSAGE: &str = "Validating Prior Authorization Form...";
