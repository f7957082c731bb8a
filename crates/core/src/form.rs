//! Patient form state and the payload that carries extraction results to the form step.

use crate::code::{Code, CodeKind};
use crate::code_list::CodeList;
use pa_api_shared::RelevantCode;
use pa_types::CodeId;
use serde::{Deserialize, Serialize};

/// Editable patient form. Serialises to the submission request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    /// ISO date (`YYYY-MM-DD`) as entered or extracted; not parsed.
    pub date_of_birth: String,
    pub procedure_codes: CodeList,
    pub diagnosis_codes: CodeList,
}

/// The free-text identity fields of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityField {
    FirstName,
    LastName,
    DateOfBirth,
}

impl PatientForm {
    pub fn codes(&self, kind: CodeKind) -> &CodeList {
        match kind {
            CodeKind::Procedure => &self.procedure_codes,
            CodeKind::Diagnosis => &self.diagnosis_codes,
        }
    }

    /// Appends a blank code and returns its identifier.
    pub fn add_code(&mut self, kind: CodeKind) -> CodeId {
        let code = Code::blank();
        let id = code.id.clone();
        self.edit_codes(kind, |codes| codes.push(code));
        tracing::debug!(%kind, %id, "added blank code");
        id
    }

    pub fn remove_code(&mut self, kind: CodeKind, id: &CodeId) {
        self.edit_codes(kind, |codes| codes.remove(id));
    }

    pub fn update_code(&mut self, kind: CodeKind, id: &CodeId, value: impl Into<String>) {
        let value = value.into();
        self.edit_codes(kind, |codes| codes.update(id, value));
    }

    pub fn set_field(&mut self, field: IdentityField, value: impl Into<String>) {
        let slot = match field {
            IdentityField::FirstName => &mut self.first_name,
            IdentityField::LastName => &mut self.last_name,
            IdentityField::DateOfBirth => &mut self.date_of_birth,
        };
        *slot = value.into();
    }

    fn edit_codes(&mut self, kind: CodeKind, edit: impl FnOnce(CodeList) -> CodeList) {
        let slot = match kind {
            CodeKind::Procedure => &mut self.procedure_codes,
            CodeKind::Diagnosis => &mut self.diagnosis_codes,
        };
        *slot = edit(std::mem::take(slot));
    }
}

/// State attached to the route transition from the upload step to the form step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormHandoff {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub relevant_diagnosis: Vec<RelevantCode>,
    pub relevant_procedure: Vec<RelevantCode>,
    /// The procedure codes came from the general code table.
    pub excel_used: bool,
}
