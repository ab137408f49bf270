//! Errors raised while assembling a form from builders.

use thiserror::Error;

/// Errors that can occur when building fields, sections and forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Field name is empty. Every field needs a name to bind to the model")]
    EmptyName,

    #[error("Section name is empty")]
    EmptySectionName,

    #[error("Section '{name}' is declared more than once")]
    DuplicateSection { name: String },

    #[error("Field '{name}' is declared more than once")]
    DuplicateField { name: String },

    #[error("Invalid pattern on field '{field}': {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("Form has no sections. Add at least one with .section(...)")]
    EmptyForm,
}
