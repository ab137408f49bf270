//! Controllers: the form, its sections and its fields.
//!
//! A [`FormController`] owns an ordered list of [`SectionController`]s, each
//! owning an ordered list of [`FieldController`]s. Fields read and write
//! their values through the form's [`FormModel`](crate::model::FormModel);
//! when the model changes, the form refreshes the field with that name.
//!
//! Display order, lookup order and error order are all the same: sections
//! in insertion order, then fields in insertion order.
//!
//! # Example
//!
//! ```rust
//! use formwire::controller::{FieldController, FormController, SectionController};
//! use formwire::model::{FieldType, FormModel, MapBackend};
//!
//! let model = FormModel::new(MapBackend::new().with_field("name", FieldType::Text));
//! let mut form = FormController::new(model.clone());
//! form.add_section(
//!     SectionController::new("about")
//!         .with_element(FieldController::new("name", "Name").with_required(true)),
//! );
//!
//! assert!(!form.is_valid_input());
//! model.set_value("name", Some("Ada".into()));
//! assert!(form.is_valid_input());
//! ```

mod field;
mod form;
mod section;
mod tasks;
mod view;

pub use field::{coerce, parse_input, DisplayState, FieldController, FieldKind, Validatable};
pub use form::FormController;
pub use section::{find_element, SectionController};
pub use tasks::{TaskOutcome, TaskReporter};
pub use view::{ViewFactory, ViewId, ViewIdAllocator};
