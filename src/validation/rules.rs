//! Field validation rules.
//!
//! Rules return a `Validation` so a field can accumulate every failure in a
//! single pass instead of stopping at the first one.

use crate::model::FieldValue;
use crate::validation::error::{ErrorKind, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of one rule (or of all rules of a field).
pub type RuleCheck = Validation<(), NonEmptyVec<ValidationError>>;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("e-mail pattern is a valid regex")
});

/// Whether a failed required check hides the field's other rule failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredPolicy {
    /// Report only the required error for an empty required field.
    #[default]
    ShortCircuit,

    /// Report the required error, then run the remaining rules anyway.
    RunAllRules,
}

/// The field a rule is being evaluated for.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo<'a> {
    pub name: &'a str,
    pub label: &'a str,
}

impl FieldInfo<'_> {
    pub fn error(&self, kind: ErrorKind) -> ValidationError {
        ValidationError::new(self.name, self.label, kind)
    }

    pub fn fail(&self, kind: ErrorKind) -> RuleCheck {
        Validation::fail(self.error(kind))
    }

    pub fn pass(&self) -> RuleCheck {
        Validation::success(())
    }
}

/// A validation rule attached to a field.
///
/// `value` is the field's current value after coercion to its native type;
/// `None` means the field is empty.
pub trait InputValidator {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck;
}

impl<F> InputValidator for F
where
    F: Fn(Option<&FieldValue>, &FieldInfo<'_>) -> RuleCheck,
{
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        self(value, field)
    }
}

/// Minimum length of text (characters) or lists (items).
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl InputValidator for MinLength {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        match value.and_then(FieldValue::len) {
            Some(len) if len > 0 && len < self.0 => field.fail(ErrorKind::TooShort { min: self.0 }),
            _ => field.pass(),
        }
    }
}

/// Maximum length of text (characters) or lists (items).
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl InputValidator for MaxLength {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        match value.and_then(FieldValue::len) {
            Some(len) if len > self.0 => field.fail(ErrorKind::TooLong { max: self.0 }),
            _ => field.pass(),
        }
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl InputValidator for Range {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        match value.and_then(FieldValue::as_f64) {
            // NaN compares false both ways, so it must be rejected explicitly
            Some(n) if n.is_nan() || n < self.min || n > self.max => {
                field.fail(ErrorKind::OutOfRange {
                    min: self.min,
                    max: self.max,
                })
            }
            _ => field.pass(),
        }
    }
}

/// Text must match a regular expression. The expression is not anchored.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl InputValidator for Pattern {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        match value.and_then(FieldValue::as_text) {
            Some(text) if !text.is_empty() && !self.0.is_match(text) => {
                field.fail(ErrorKind::PatternMismatch)
            }
            _ => field.pass(),
        }
    }
}

/// Text must look like an e-mail address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl InputValidator for Email {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        match value.and_then(FieldValue::as_text) {
            Some(text) if !text.is_empty() && !EMAIL_REGEX.is_match(text) => {
                field.fail(ErrorKind::InvalidEmail)
            }
            _ => field.pass(),
        }
    }
}

/// Host-defined check reported under a custom message key.
///
/// Unlike the built-in rules, the predicate also sees empty values.
pub struct Predicate {
    key: String,
    check: Box<dyn Fn(Option<&FieldValue>) -> bool>,
}

impl Predicate {
    pub fn new<F>(key: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<&FieldValue>) -> bool + 'static,
    {
        Self {
            key: key.into(),
            check: Box::new(check),
        }
    }
}

impl InputValidator for Predicate {
    fn validate(&self, value: Option<&FieldValue>, field: &FieldInfo<'_>) -> RuleCheck {
        if (self.check)(value) {
            field.pass()
        } else {
            field.fail(ErrorKind::Custom {
                key: self.key.clone(),
                args: Vec::new(),
            })
        }
    }
}

/// Flatten an accumulated check into errors, keeping their order.
pub fn into_errors(check: RuleCheck) -> Vec<ValidationError> {
    match check {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
