//! # PA Types
//!
//! Small validated value types shared by the prior-authorisation crates.
//!
//! - [`NonEmptyText`]: trimmed text that is guaranteed to contain something
//! - [`CodeId`]: the opaque identity of one editable code entry

mod code_id;

pub use code_id::{CodeId, CodeIdError};

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("text is blank")]
    Empty,
}

/// Text trimmed at the edges with at least one character left.
///
/// Used for values the workflow cannot do anything sensible with when blank: file names, base
/// URLs, media types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// # Errors
    ///
    /// `TextError::Empty` when nothing is left after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            text => Ok(Self(text.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyText> for String {
    fn from(text: NonEmptyText) -> Self {
        text.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  application/pdf \n").expect("non-empty");
        assert_eq!(text.as_str(), "application/pdf");
    }

    #[test]
    fn rejects_whitespace_only() {
        assert!(matches!(NonEmptyText::new(" \t "), Err(TextError::Empty)));
    }

    #[test]
    fn deserialize_rejects_blank_strings() {
        let err = serde_json::from_str::<NonEmptyText>("\"   \"").expect_err("blank");
        assert!(err.to_string().contains("blank"));
    }
}
