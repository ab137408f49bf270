//! Strategies that put aggregated validation errors in front of the user.

use crate::controller::{find_element, SectionController};
use crate::validation::error::ValidationError;
use crate::validation::messages::{DefaultMessages, MessageResolver};
use std::cell::RefCell;
use std::rc::Rc;

/// Pluggable error display, invoked by the form with the full error list.
///
/// Errors naming a field that is not on the form are lookup misses: a
/// strategy logs and skips them.
pub trait ValidationErrorDisplay {
    fn show_errors(&mut self, sections: &[SectionController], errors: &[ValidationError]);

    fn reset_errors(&mut self, sections: &[SectionController]);
}

/// Default strategy: each error is shown on the field it names.
///
/// Errors are applied in order, so when a field has several errors the last
/// one (by rule order) is the one left showing.
pub struct PerFieldValidationErrorDisplay {
    resolver: Box<dyn MessageResolver>,
}

impl PerFieldValidationErrorDisplay {
    pub fn new(resolver: impl MessageResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }
}

impl Default for PerFieldValidationErrorDisplay {
    fn default() -> Self {
        Self::new(DefaultMessages::new())
    }
}

impl ValidationErrorDisplay for PerFieldValidationErrorDisplay {
    fn show_errors(&mut self, sections: &[SectionController], errors: &[ValidationError]) {
        for error in errors {
            let name = error.field_name();
            match find_element(sections, name) {
                Some(field) => field.set_error(Some(error.message(self.resolver.as_ref()))),
                None => tracing::warn!(field = %name, "validation error for field not on this form"),
            }
        }
    }

    fn reset_errors(&mut self, sections: &[SectionController]) {
        for section in sections {
            for field in section.elements() {
                field.set_error(None);
            }
        }
    }
}

/// Collects resolved messages into one list, e.g. for a banner at the top
/// of the form. Clones share the same list, so keep one to read it back.
#[derive(Clone)]
pub struct ErrorSummaryDisplay {
    resolver: Rc<dyn MessageResolver>,
    messages: Rc<RefCell<Vec<String>>>,
}

impl ErrorSummaryDisplay {
    pub fn new(resolver: impl MessageResolver + 'static) -> Self {
        Self {
            resolver: Rc::new(resolver),
            messages: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Default for ErrorSummaryDisplay {
    fn default() -> Self {
        Self::new(DefaultMessages::new())
    }
}

impl ValidationErrorDisplay for ErrorSummaryDisplay {
    fn show_errors(&mut self, sections: &[SectionController], errors: &[ValidationError]) {
        let messages = errors
            .iter()
            .filter(|error| {
                let known = find_element(sections, error.field_name()).is_some();
                if !known {
                    tracing::warn!(field = %error.field_name(), "validation error for field not on this form");
                }
                known
            })
            .map(|error| error.message(self.resolver.as_ref()))
            .collect();
        *self.messages.borrow_mut() = messages;
    }

    fn reset_errors(&mut self, _sections: &[SectionController]) {
        self.messages.borrow_mut().clear();
    }
}
