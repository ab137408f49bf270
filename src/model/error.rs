//! Field access errors raised by model backends.

use crate::model::value::FieldType;
use thiserror::Error;

/// Errors a [`ModelBackend`](crate::model::ModelBackend) can report.
///
/// These never escape [`FormModel`](crate::model::FormModel): reads degrade to
/// `None`, writes to a no-op, and the error is logged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    #[error("Backing model has no field '{name}'")]
    NoSuchField { name: String },

    #[error("Field '{name}' holds {expected} values, got {found}")]
    TypeMismatch {
        name: String,
        expected: FieldType,
        found: FieldType,
    },

    #[error("Type of field '{name}' cannot be determined")]
    UnknownType { name: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}
