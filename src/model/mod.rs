//! Form models: values, backing-object bindings and change notification.
//!
//! A [`FormModel`] wraps exactly one [`ModelBackend`]. Reads and writes go
//! through it by field name, and every successful write emits a
//! [`ChangeEvent`] to the registered listeners. Access failures are
//! recoverable: they are logged and surface as a `None` read or a no-op write.
//!
//! # Example
//!
//! ```rust
//! use formwire::model::{FieldType, FieldValue, FormModel, MapBackend};
//!
//! let model = FormModel::new(MapBackend::new().with_field("email", FieldType::Text));
//! let subscription = model.subscribe(|event| println!("{} changed", event.name));
//!
//! model.set_value("email", Some("ada@example.com".into()));
//! assert_eq!(model.get_value("email"), Some(FieldValue::from("ada@example.com")));
//! assert_eq!(model.get_value("unknown"), None);
//!
//! drop(subscription);
//! assert_eq!(model.listener_count(), 0);
//! ```

mod backend;
mod error;
mod form_model;
mod value;

pub use backend::{MapBackend, ModelBackend, SerdeBackend};
pub use error::AccessError;
pub use form_model::{ChangeEvent, FormModel, Subscription};
pub use value::{FieldType, FieldValue};
