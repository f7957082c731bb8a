//! Submission rules for the patient form.
//!
//! Rules run in a fixed order and stop at the first failing class:
//! 1. both code lists are non-empty
//! 2. no code value is empty or whitespace
//! 3. every procedure code is exactly five characters with at least four digits
//!
//! Later rules rely on the earlier ones, so the order must not change. Diagnosis codes are only
//! checked for blanks.

use crate::constants::{PROCEDURE_CODE_LEN, PROCEDURE_CODE_MIN_DIGITS};
use crate::error::{ValidationError, WorkflowError};
use crate::form::PatientForm;
use pa_types::CodeId;

pub struct SubmissionValidator;

impl SubmissionValidator {
    /// Checks `form` against the submission rules.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::ValidationFailed`] with [`ValidationError::MissingCodes`] or
    ///   [`ValidationError::BlankCodes`] for blocking problems
    /// - [`WorkflowError::FormatRejected`] listing the malformed procedure codes
    pub fn validate(form: &PatientForm) -> Result<(), WorkflowError> {
        if form.procedure_codes.is_empty() || form.diagnosis_codes.is_empty() {
            return Err(ValidationError::MissingCodes.into());
        }

        let has_blank = form
            .procedure_codes
            .iter()
            .chain(form.diagnosis_codes.iter())
            .any(|code| code.value.trim().is_empty());
        if has_blank {
            return Err(ValidationError::BlankCodes.into());
        }

        let invalid: Vec<CodeId> = form
            .procedure_codes
            .iter()
            .filter(|code| !Self::is_valid_procedure_code(&code.value))
            .map(|code| code.id.clone())
            .collect();
        if !invalid.is_empty() {
            return Err(WorkflowError::FormatRejected { invalid });
        }

        Ok(())
    }

    /// Exactly five characters, at least four of them ASCII digits. Surrounding whitespace
    /// counts towards the length.
    pub fn is_valid_procedure_code(value: &str) -> bool {
        value.chars().count() == PROCEDURE_CODE_LEN
            && value.chars().filter(char::is_ascii_digit).count() >= PROCEDURE_CODE_MIN_DIGITS
    }
}
