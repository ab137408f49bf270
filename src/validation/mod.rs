//! Field validation: rules, errors, message resolution and error display.
//!
//! Validation failures are values, not errors. Every rule of a field returns
//! a `Validation`, and the field accumulates ALL failures instead of stopping
//! at the first, so the user sees every problem at once.
//!
//! # Example
//!
//! ```rust
//! use formwire::model::FieldValue;
//! use formwire::validation::{into_errors, ErrorKind, FieldInfo, InputValidator, MaxLength};
//!
//! let field = FieldInfo { name: "nick", label: "Nickname" };
//! let value = FieldValue::from("a-very-long-nickname");
//!
//! let errors = into_errors(MaxLength(8).validate(Some(&value), &field));
//! assert_eq!(errors[0].kind(), &ErrorKind::TooLong { max: 8 });
//! ```

mod display;
mod error;
mod messages;
mod rules;

pub use display::{ErrorSummaryDisplay, PerFieldValidationErrorDisplay, ValidationErrorDisplay};
pub use error::{ErrorKind, ValidationError};
pub use messages::{DefaultMessages, MessageResolver};
pub use rules::{
    into_errors, Email, FieldInfo, InputValidator, MaxLength, MinLength, Pattern, Predicate,
    Range, RequiredPolicy, RuleCheck,
};
