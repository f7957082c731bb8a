//! Ordered list of editable codes for one category.
//!
//! Every edit consumes the list and returns the edited list, so a caller never observes a list
//! half-way through a change and no two views share one underlying vector.
//!
//! Identifiers of prefilled entries are the code strings themselves and may repeat. `remove` and
//! `update` act on every entry carrying the identifier.

use crate::code::Code;
use pa_types::CodeId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeList(Vec<Code>);

impl CodeList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a blank entry with a fresh identifier.
    #[must_use]
    pub fn add(self) -> Self {
        self.push(Code::blank())
    }

    /// Appends `code` as is.
    #[must_use]
    pub fn push(mut self, code: Code) -> Self {
        self.0.push(code);
        self
    }

    /// Removes the entries with identifier `id`. Survivors keep their relative order. Removing
    /// an unknown identifier returns the list unchanged.
    #[must_use]
    pub fn remove(mut self, id: &CodeId) -> Self {
        self.0.retain(|code| &code.id != id);
        self
    }

    /// Replaces the value of the entries with identifier `id`, keeping identifier, reason and
    /// annotation. Unknown identifiers are ignored.
    #[must_use]
    pub fn update(mut self, id: &CodeId, value: impl Into<String>) -> Self {
        let value = value.into();
        for code in self.0.iter_mut().filter(|code| &code.id == id) {
            code.value.clone_from(&value);
        }
        self
    }

    pub fn get(&self, id: &CodeId) -> Option<&Code> {
        self.0.iter().find(|code| &code.id == id)
    }

    pub fn last(&self) -> Option<&Code> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Code> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Code] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Code> for CodeList {
    fn from_iter<I: IntoIterator<Item = Code>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CodeList {
    type Item = &'a Code;
    type IntoIter = std::slice::Iter<'a, Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
