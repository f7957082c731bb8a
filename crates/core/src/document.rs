//! Documents selected for upload.

use crate::constants::OCTET_STREAM_MEDIA_TYPE;
use crate::{CoreError, CoreResult};
use pa_types::NonEmptyText;
use std::path::Path;

/// A file picked for upload, with the media type its source declared for it.
///
/// Acceptance is decided on the declared type alone; the bytes are never inspected by the
/// workflow.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    file_name: NonEmptyText,
    declared_type: String,
    bytes: Vec<u8>,
}

impl DocumentUpload {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `file_name` is blank.
    pub fn new(
        file_name: impl AsRef<str>,
        declared_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> CoreResult<Self> {
        let file_name = NonEmptyText::new(file_name)
            .map_err(|_| CoreError::InvalidInput("document file name cannot be empty".into()))?;
        Ok(Self {
            file_name,
            declared_type: declared_type.into(),
            bytes,
        })
    }

    /// Reads a document from disk and declares its type from the content.
    ///
    /// Unrecognised content is declared as `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DocumentRead` if the file cannot be read and
    /// `CoreError::InvalidInput` if the path has no usable file name.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "document path has no file name: {}",
                    path.display()
                ))
            })?
            .to_string();

        let bytes = std::fs::read(path).map_err(CoreError::DocumentRead)?;
        let declared_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or(OCTET_STREAM_MEDIA_TYPE)
            .to_string();

        tracing::debug!(
            file = %file_name,
            declared_type = %declared_type,
            size = bytes.len(),
            "loaded document"
        );
        Self::new(file_name, declared_type, bytes)
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_of_type(&self, accepted: &NonEmptyText) -> bool {
        self.declared_type == accepted.as_str()
    }
}

impl std::fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("declared_type", &self.declared_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}
