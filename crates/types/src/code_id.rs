//! Identity of a single editable code entry.
//!
//! A [`CodeId`] only exists so that list edits can address one entry. Entries created in the
//! form get a fresh random identifier (hyphenated UUID v4, the same shape a browser's
//! `crypto.randomUUID()` produces). Entries prefilled from the extraction service reuse the code
//! string the service returned, so two prefilled entries can share an identifier.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Error returned when an externally supplied identifier is unusable.
#[derive(Debug, thiserror::Error)]
pub enum CodeIdError {
    #[error("code identifier cannot be empty")]
    Empty,
}

/// Opaque identifier of one code entry.
///
/// Serialises as a bare JSON string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CodeId(String);

impl CodeId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Wraps an identifier received from outside the client, such as a code string returned by
    /// the extraction service.
    ///
    /// # Errors
    ///
    /// Returns [`CodeIdError::Empty`] if `input` is empty.
    pub fn parse(input: impl Into<String>) -> Result<Self, CodeIdError> {
        let input = input.into();
        if input.is_empty() {
            return Err(CodeIdError::Empty);
        }
        Ok(Self(input))
    }

    /// Wraps a code string verbatim. Unlike [`CodeId::parse`] this accepts an empty string,
    /// because prefilled entries must never be dropped.
    pub fn from_code(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CodeId {
    type Err = CodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeId::parse(s)
    }
}

impl AsRef<str> for CodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
