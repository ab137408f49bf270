//! Message resolution for validation errors.
//!
//! Localization belongs to the host: it implements [`MessageResolver`] over
//! its own resources. [`DefaultMessages`] is an English catalog with
//! positional `{0}`, `{1}`, ... placeholders.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is a valid regex"));

/// Turns a message key and its positional arguments into display text.
pub trait MessageResolver {
    fn resolve(&self, key: &str, args: &[String]) -> String;
}

/// Built-in English catalog. Unknown keys resolve to the key itself.
#[derive(Clone, Debug)]
pub struct DefaultMessages {
    templates: HashMap<String, String>,
}

impl DefaultMessages {
    pub fn new() -> Self {
        let templates = [
            ("required_field_error_msg", "{0} is required"),
            ("input_too_short_error_msg", "{0} must be at least {1} characters"),
            ("input_too_long_error_msg", "{0} must be at most {1} characters"),
            ("out_of_range_error_msg", "{0} must be between {1} and {2}"),
            ("pattern_mismatch_error_msg", "{0} has an invalid format"),
            ("invalid_email_error_msg", "{0} is not a valid e-mail address"),
            ("invalid_format_error_msg", "{0} must be a valid {1}"),
            ("invalid_option_error_msg", "{0} has no option '{1}'"),
        ]
        .into_iter()
        .map(|(key, template)| (key.to_string(), template.to_string()))
        .collect();
        Self { templates }
    }

    /// Add or replace the template for `key`.
    pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }
}

impl Default for DefaultMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageResolver for DefaultMessages {
    fn resolve(&self, key: &str, args: &[String]) -> String {
        let Some(template) = self.templates.get(key) else {
            tracing::debug!(key = %key, "no message template, using key");
            return key.to_string();
        };
        // One pass over the template, so text inside an argument is never
        // treated as a placeholder.
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| args.get(i))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
