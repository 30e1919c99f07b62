//! Error types for importing tree documents.

use thiserror::Error;

/// A structured validation failure raised while importing a document.
///
/// Import is all-or-nothing: when any of these is returned, nothing from the
/// document has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The input is not syntactically valid.
    #[error("document is not valid {format}: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },
    /// A required key is absent.
    #[error("{location}: missing required field `{field}`")]
    MissingField {
        location: String,
        field: &'static str,
    },
    /// A key holds a value of the wrong kind.
    #[error("{location}: expected {expected}")]
    InvalidType {
        location: String,
        expected: &'static str,
    },
    /// Two nodes share an id.
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    /// The document passed structural checks but could not be decoded.
    #[error("document does not match the expected shape: {0}")]
    Shape(String),
}

impl ImportError {
    /// Returns the location inside the document the error refers to, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            ImportError::MissingField { location, .. }
            | ImportError::InvalidType { location, .. } => Some(location),
            _ => None,
        }
    }
}
