//! Fluent builders for assembling forms.
//!
//! The controllers can be assembled by hand with `add_section` and
//! `add_element`; the builders do the same but reject forms a host almost
//! certainly did not mean to build: empty names, duplicate sections and
//! field names declared twice.
//!
//! # Example
//!
//! ```rust
//! use formwire::builder::{FieldBuilder, FormBuilder, SectionBuilder};
//! use formwire::model::{FieldType, FormModel, MapBackend};
//!
//! let model = FormModel::new(
//!     MapBackend::new()
//!         .with_field("email", FieldType::Text)
//!         .with_field("nick", FieldType::Text),
//! );
//!
//! let form = FormBuilder::new()
//!     .section(
//!         SectionBuilder::new("account")
//!             .field(FieldBuilder::new("email", "E-mail").required().email())
//!             .field(FieldBuilder::new("nick", "Nickname").max_length(12)),
//!     )
//!     .build(model)?;
//!
//! assert_eq!(form.number_of_elements(), 2);
//! assert!(!form.is_valid_input());
//! # Ok::<(), formwire::builder::BuildError>(())
//! ```

pub mod error;
pub mod field;
pub mod form;

pub use error::BuildError;
pub use field::FieldBuilder;
pub use form::{FormBuilder, SectionBuilder};
