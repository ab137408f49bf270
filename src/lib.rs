//! Formwire: model-bound forms with accumulating validation
//!
//! A form is an ordered list of sections, each an ordered list of fields.
//! Every field is bound by name to a property of a backing model. The form
//! keeps the fields in sync with the model and aggregates validation errors
//! across all of them, in display order.
//!
//! # Core Concepts
//!
//! - **Model**: `FormModel` wraps a backing object and notifies listeners on writes
//! - **Controllers**: `FormController` > `SectionController` > `FieldController`
//! - **Validation**: rules accumulate every failure instead of stopping at the first
//! - **Display**: a pluggable `ValidationErrorDisplay` shows the aggregated errors
//!
//! # Example
//!
//! ```rust
//! use formwire::{FieldController, FormController, SectionController};
//! use formwire::model::{FieldType, FormModel, MapBackend};
//! use formwire::validation::MinLength;
//!
//! let model = FormModel::new(
//!     MapBackend::new()
//!         .with_field("user", FieldType::Text)
//!         .with_field("password", FieldType::Text),
//! );
//!
//! let mut form = FormController::new(model.clone());
//! form.add_section(
//!     SectionController::new("login")
//!         .with_element(FieldController::new("user", "User").with_required(true))
//!         .with_element(FieldController::new("password", "Password").with_rule(MinLength(8))),
//! );
//!
//! model.set_value("user", Some("ada".into()));
//! model.set_value("password", Some("short".into()));
//!
//! let errors = form.validate_input();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].to_string(), "Password must be at least 8 characters");
//! ```

pub mod builder;
pub mod config;
pub mod controller;
pub mod model;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, FieldBuilder, FormBuilder, SectionBuilder};
pub use config::{ConfigError, FormConfig};
pub use controller::{FieldController, FieldKind, FormController, SectionController};
pub use model::{FieldValue, FormModel};
pub use validation::{ErrorKind, ValidationError, ValidationErrorDisplay};
