use serde::{Deserialize, Serialize};

/// One code suggested by the extraction service.
///
/// `id` is the code itself (for example `99213` or `E11.9`). Instances are read-only once
/// received; the form copies their fields instead of holding on to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantCode {
    pub id: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub metadata: CodeMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetadata {
    pub description: String,
}

/// Patient identity as read from the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPatient {
    pub patient_name: String,
    pub date_of_birth: String,
}

/// Successful response body of `POST /api/upload`.
///
/// `excel` is set when the procedure codes came from the general code table rather than from
/// medical guidelines. Missing code arrays read as empty and a missing `excel` as `false`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub data: ExtractedPatient,
    #[serde(default)]
    pub relevant_diagnosis: Vec<RelevantCode>,
    #[serde(default)]
    pub relevant_procedure: Vec<RelevantCode>,
    #[serde(default)]
    pub excel: bool,
}
