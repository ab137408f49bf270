//! Builder for a single field.

use crate::builder::error::BuildError;
use crate::controller::{FieldController, FieldKind};
use crate::model::FieldValue;
use crate::validation::{Email, InputValidator, MaxLength, MinLength, Pattern, Predicate, Range};

enum PendingRule {
    Ready(Box<dyn InputValidator>),
    Pattern(String),
}

/// Fluent builder for a [`FieldController`].
///
/// Rules keep the order they are added in. Patterns are compiled in
/// [`build`](FieldBuilder::build), so a bad regex surfaces as a
/// [`BuildError::InvalidPattern`] rather than a panic.
pub struct FieldBuilder {
    name: String,
    label: String,
    required: bool,
    kind: FieldKind,
    rules: Vec<PendingRule>,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            kind: FieldKind::default(),
            rules: Vec::new(),
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the native type
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add any validator
    pub fn rule(mut self, rule: impl InputValidator + 'static) -> Self {
        self.rules.push(PendingRule::Ready(Box::new(rule)));
        self
    }

    /// Add a predicate check reported under `key`
    pub fn rule_fn<F>(self, key: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<&FieldValue>) -> bool + 'static,
    {
        self.rule(Predicate::new(key, check))
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(MaxLength(max))
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.rule(Range::new(min, max))
    }

    pub fn email(self) -> Self {
        self.rule(Email)
    }

    /// Require the whole text to match `pattern`
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.rules.push(PendingRule::Pattern(pattern.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the field controller.
    /// Returns an error if the name is empty or a pattern does not compile.
    pub fn build(self) -> Result<FieldController, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptyName);
        }

        let mut field = FieldController::new(self.name, self.label)
            .with_required(self.required)
            .with_kind(self.kind);

        for rule in self.rules {
            let rule: Box<dyn InputValidator> = match rule {
                PendingRule::Ready(rule) => rule,
                PendingRule::Pattern(pattern) => {
                    let anchored = format!("^(?:{pattern})$");
                    let compiled = Pattern::new(&anchored).map_err(|e| BuildError::InvalidPattern {
                        field: field.name().to_string(),
                        reason: e.to_string(),
                    })?;
                    Box::new(compiled)
                }
            };
            field.push_rule(rule);
        }

        Ok(field)
    }
}
