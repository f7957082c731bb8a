//! Conversion of extraction-service output into form state.
//!
//! The adapter runs once per form mount. Re-running it would mint nothing new (prefilled
//! identifiers are the codes themselves) but the form owns its lists after hydration and user
//! edits must not be overwritten.

use crate::code::Code;
use crate::code_list::CodeList;
use crate::form::{FormHandoff, PatientForm};
use pa_api_shared::{ExtractionResponse, RelevantCode};
use pa_types::CodeId;

pub struct ExtractionAdapter;

impl ExtractionAdapter {
    /// Copies each suggested code into an editable entry, in input order. Duplicates are kept
    /// as separate entries.
    pub fn to_codes(source: &[RelevantCode]) -> CodeList {
        source
            .iter()
            .map(|relevant| Code {
                id: CodeId::from_code(relevant.id.clone()),
                value: relevant.id.clone(),
                reason: Some(relevant.reason.clone()),
                annotation: Some(relevant.annotation.clone()),
            })
            .collect()
    }

    /// Splits a full name at the first space.
    ///
    /// The first token is the first name and everything after the first space is the last name,
    /// so `"Mary Jane Watson"` gives `("Mary", "Jane Watson")` and a single word gives an empty
    /// last name.
    pub fn split_patient_name(full_name: &str) -> (String, String) {
        match full_name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (full_name.to_string(), String::new()),
        }
    }

    /// Builds the route payload for the form step from a successful extraction.
    pub fn handoff(response: ExtractionResponse) -> FormHandoff {
        let (first_name, last_name) = Self::split_patient_name(&response.data.patient_name);
        FormHandoff {
            first_name,
            last_name,
            date_of_birth: response.data.date_of_birth,
            relevant_diagnosis: response.relevant_diagnosis,
            relevant_procedure: response.relevant_procedure,
            excel_used: response.excel,
        }
    }

    /// Builds the initial form from a route payload.
    pub fn hydrate(handoff: &FormHandoff) -> PatientForm {
        PatientForm {
            first_name: handoff.first_name.clone(),
            last_name: handoff.last_name.clone(),
            date_of_birth: handoff.date_of_birth.clone(),
            procedure_codes: Self::to_codes(&handoff.relevant_procedure),
            diagnosis_codes: Self::to_codes(&handoff.relevant_diagnosis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pa_api_shared::{CodeMetadata, ExtractedPatient};

    fn relevant(id: &str, reason: &str) -> RelevantCode {
        RelevantCode {
            id: id.into(),
            reason: reason.into(),
            annotation: format!("note for {id}"),
            metadata: CodeMetadata {
                description: format!("description of {id}"),
            },
        }
    }

    #[test]
    fn splits_two_part_name() {
        assert_eq!(
            ExtractionAdapter::split_patient_name("John Smith"),
            ("John".to_string(), "Smith".to_string())
        );
    }

    #[test]
    fn single_word_name_has_empty_last_name() {
        assert_eq!(
            ExtractionAdapter::split_patient_name("Madonna"),
            ("Madonna".to_string(), String::new())
        );
    }

    #[test]
    fn keeps_remaining_tokens_in_last_name() {
        assert_eq!(
            ExtractionAdapter::split_patient_name("Mary Jane Watson"),
            ("Mary".to_string(), "Jane Watson".to_string())
        );
    }

    #[test]
    fn empty_name_gives_empty_parts() {
        assert_eq!(
            ExtractionAdapter::split_patient_name(""),
            (String::new(), String::new())
        );
    }

    #[test]
    fn to_codes_copies_fields_in_order() {
        let source = vec![relevant("E11.9", "HbA1c"), relevant("I10", "BP 150/95")];

        let codes = ExtractionAdapter::to_codes(&source);

        assert_eq!(codes.len(), 2);
        let first = &codes.as_slice()[0];
        assert_eq!(first.id.as_str(), "E11.9");
        assert_eq!(first.value, "E11.9");
        assert_eq!(first.reason.as_deref(), Some("HbA1c"));
        assert_eq!(first.annotation.as_deref(), Some("note for E11.9"));
        assert_eq!(codes.as_slice()[1].value, "I10");
    }

    #[test]
    fn to_codes_keeps_duplicates() {
        let source = vec![
            relevant("99213", "visit"),
            relevant("99213", "follow-up"),
            relevant("20610", "injection"),
        ];

        let codes = ExtractionAdapter::to_codes(&source);

        let values: Vec<&str> = codes.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["99213", "99213", "20610"]);
        assert_eq!(codes.as_slice()[1].reason.as_deref(), Some("follow-up"));
    }

    #[test]
    fn to_codes_of_empty_input_is_empty() {
        assert!(ExtractionAdapter::to_codes(&[]).is_empty());
    }

    #[test]
    fn handoff_and_hydrate_carry_identity_and_codes() {
        let response = ExtractionResponse {
            data: ExtractedPatient {
                patient_name: "Sarah Jane Williams".into(),
                date_of_birth: "1992-03-20".into(),
            },
            relevant_diagnosis: vec![relevant("E11.9", "HbA1c")],
            relevant_procedure: vec![relevant("99213", "visit"), relevant("20610", "inj")],
            excel: true,
        };

        let handoff = ExtractionAdapter::handoff(response);
        assert_eq!(handoff.first_name, "Sarah");
        assert_eq!(handoff.last_name, "Jane Williams");
        assert!(handoff.excel_used);

        let form = ExtractionAdapter::hydrate(&handoff);
        assert_eq!(form.date_of_birth, "1992-03-20");
        assert_eq!(form.procedure_codes.len(), 2);
        assert_eq!(form.diagnosis_codes.len(), 1);
        assert_eq!(form.procedure_codes.as_slice()[1].value, "20610");
    }
}
