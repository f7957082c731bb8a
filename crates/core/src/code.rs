//! Editable code entries.

use pa_types::CodeId;
use serde::{Deserialize, Serialize};

/// The two code categories on the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodeKind {
    Procedure,
    Diagnosis,
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeKind::Procedure => f.write_str("procedure"),
            CodeKind::Diagnosis => f.write_str("diagnosis"),
        }
    }
}

/// One procedure or diagnosis code as edited in the form.
///
/// `reason` and `annotation` are only present on entries prefilled from the extraction service
/// and survive value edits unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub id: CodeId,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Code {
    /// A blank entry with a freshly generated identifier.
    pub fn blank() -> Self {
        Self {
            id: CodeId::generate(),
            value: String::new(),
            reason: None,
            annotation: None,
        }
    }
}
