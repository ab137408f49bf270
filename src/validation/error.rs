//! Validation errors: one failed constraint on one named field.

use crate::model::FieldType;
use crate::validation::messages::MessageResolver;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The constraint that failed.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("is required")]
    Required,

    #[error("must be at least {min} characters")]
    TooShort { min: usize },

    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    #[error("must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },

    #[error("has an invalid format")]
    PatternMismatch,

    #[error("is not a valid e-mail address")]
    InvalidEmail,

    #[error("must be a valid {expected}")]
    InvalidFormat { expected: FieldType },

    #[error("has no option '{value}'")]
    InvalidOption { value: String },

    #[error("failed check '{key}'")]
    Custom { key: String, args: Vec<String> },
}

impl ErrorKind {
    /// Key the host's message catalog resolves.
    pub fn message_key(&self) -> &str {
        match self {
            Self::Required => "required_field_error_msg",
            Self::TooShort { .. } => "input_too_short_error_msg",
            Self::TooLong { .. } => "input_too_long_error_msg",
            Self::OutOfRange { .. } => "out_of_range_error_msg",
            Self::PatternMismatch => "pattern_mismatch_error_msg",
            Self::InvalidEmail => "invalid_email_error_msg",
            Self::InvalidFormat { .. } => "invalid_format_error_msg",
            Self::InvalidOption { .. } => "invalid_option_error_msg",
            Self::Custom { key, .. } => key,
        }
    }
}

/// Immutable record of a failed rule, produced fresh on every validation pass.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("{field_label} {kind}")]
pub struct ValidationError {
    field_name: String,
    field_label: String,
    kind: ErrorKind,
}

impl ValidationError {
    pub fn new(field_name: impl Into<String>, field_label: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            field_name: field_name.into(),
            field_label: field_label.into(),
            kind,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_label(&self) -> &str {
        &self.field_label
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message_key(&self) -> &str {
        self.kind.message_key()
    }

    /// Positional message arguments. `{0}` is always the field label.
    pub fn message_args(&self) -> Vec<String> {
        let mut args = vec![self.field_label.clone()];
        match &self.kind {
            ErrorKind::TooShort { min } => args.push(min.to_string()),
            ErrorKind::TooLong { max } => args.push(max.to_string()),
            ErrorKind::OutOfRange { min, max } => {
                args.push(min.to_string());
                args.push(max.to_string());
            }
            ErrorKind::InvalidFormat { expected } => args.push(expected.to_string()),
            ErrorKind::InvalidOption { value } => args.push(value.clone()),
            ErrorKind::Custom { args: extra, .. } => args.extend(extra.iter().cloned()),
            ErrorKind::Required | ErrorKind::PatternMismatch | ErrorKind::InvalidEmail => {}
        }
        args
    }

    /// Final display string, formatted by the host's resolver.
    pub fn message(&self, resolver: &dyn MessageResolver) -> String {
        resolver.resolve(self.message_key(), &self.message_args())
    }
}
