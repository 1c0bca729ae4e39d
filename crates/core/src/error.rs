//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised when a raw wire value cannot be turned into its typed form. These
/// never abort a validation pass; the engine turns them into findings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A document number did not match `TYPE SERIES/NUMBER`.
    #[error("invalid document number: {0:?}")]
    InvalidDocumentNumber(String),

    /// A document number fits the grammar but its sequence exceeds `u64`.
    #[error("document number out of range: {0:?}")]
    DocumentNumberOutOfRange(String),

    /// A code was not a member of its closed set (e.g. an unknown tax type).
    #[error("unknown {kind} code: {value:?}")]
    UnknownCode { kind: &'static str, value: String },
}

impl DomainError {
    pub fn invalid_document_number(raw: impl Into<String>) -> Self {
        Self::InvalidDocumentNumber(raw.into())
    }

    pub fn document_number_out_of_range(raw: impl Into<String>) -> Self {
        Self::DocumentNumberOutOfRange(raw.into())
    }

    pub fn unknown_code(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownCode {
            kind,
            value: value.into(),
        }
    }
}
