//! Backing-object bindings.
//!
//! A [`ModelBackend`] is the capability a host implements to connect its own
//! data type to a form. Two bindings ship with the crate: [`MapBackend`], a
//! dictionary with a declared schema, and [`SerdeBackend`], which reaches the
//! named fields of any serde struct through its JSON representation.

use crate::model::error::AccessError;
use crate::model::value::{FieldType, FieldValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

/// Named read/write access to a backing object.
pub trait ModelBackend: 'static {
    /// Read the current value of `name`. `Ok(None)` is a present but null field.
    fn get(&self, name: &str) -> Result<Option<FieldValue>, AccessError>;

    /// Write `value` to `name`. `None` clears the field.
    fn set(&mut self, name: &str, value: Option<FieldValue>) -> Result<(), AccessError>;

    /// Type of the values `name` accepts.
    fn type_of(&self, name: &str) -> Result<FieldType, AccessError>;

    /// The backing object itself, for hosts that need their data back.
    fn as_any(&self) -> &dyn Any;
}

/// Dictionary backing with an explicit schema.
///
/// Every field must be declared with a type before it can be read or written;
/// values are nullable.
#[derive(Clone, Debug, Default)]
pub struct MapBackend {
    schema: BTreeMap<String, FieldType>,
    values: BTreeMap<String, FieldValue>,
}

impl MapBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a null field of the given type.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.schema.insert(name.into(), field_type);
        self
    }

    /// Declare a field and give it an initial value; the type comes from the value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        let value = value.into();
        self.schema.insert(name.clone(), value.field_type());
        self.values.insert(name, value);
        self
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }
}

impl ModelBackend for MapBackend {
    fn get(&self, name: &str) -> Result<Option<FieldValue>, AccessError> {
        if !self.schema.contains_key(name) {
            return Err(AccessError::NoSuchField {
                name: name.to_string(),
            });
        }
        Ok(self.values.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: Option<FieldValue>) -> Result<(), AccessError> {
        let expected = self.type_of(name)?;
        match value {
            None => {
                self.values.remove(name);
            }
            Some(value) if value.field_type() == expected => {
                self.values.insert(name.to_string(), value);
            }
            Some(value) => {
                return Err(AccessError::TypeMismatch {
                    name: name.to_string(),
                    expected,
                    found: value.field_type(),
                });
            }
        }
        Ok(())
    }

    fn type_of(&self, name: &str) -> Result<FieldType, AccessError> {
        self.schema
            .get(name)
            .copied()
            .ok_or_else(|| AccessError::NoSuchField {
                name: name.to_string(),
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Binds the public fields of a serde struct by name.
///
/// Reads serialize the object and look the field up; writes patch the JSON
/// object and deserialize it back, so a value the struct cannot hold is
/// rejected and the object is left untouched.
///
/// Dates and times travel through JSON as strings. Reads turn them back into
/// `Date`/`Time` when the field's type is known, either from a type hint or
/// from the last value written to it.
#[derive(Clone, Debug)]
pub struct SerdeBackend<T> {
    object: T,
    type_hints: HashMap<String, FieldType>,
    written: HashMap<String, FieldType>,
}

impl<T> SerdeBackend<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    pub fn new(object: T) -> Self {
        Self {
            object,
            type_hints: HashMap::new(),
            written: HashMap::new(),
        }
    }

    /// Type reported for `name` while its value is null (e.g. an `Option` field).
    pub fn with_type_hint(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.type_hints.insert(name.into(), field_type);
        self
    }

    pub fn object(&self) -> &T {
        &self.object
    }

    pub fn into_inner(self) -> T {
        self.object
    }

    fn fields(&self) -> Result<Map<String, Value>, AccessError> {
        match serde_json::to_value(&self.object) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(AccessError::Serialization(format!(
                "backing object serializes to {other}, not a struct"
            ))),
            Err(e) => Err(AccessError::Serialization(e.to_string())),
        }
    }

    fn known_type(&self, name: &str) -> Option<FieldType> {
        self.type_hints
            .get(name)
            .or_else(|| self.written.get(name))
            .copied()
    }

    fn read(&self, name: &str, json: &Value) -> Option<FieldValue> {
        match (FieldValue::from_json(json), self.known_type(name)) {
            (Some(FieldValue::Text(text)), Some(target @ (FieldType::Date | FieldType::Time))) => {
                Some(FieldValue::parse_temporal(&text, target).unwrap_or(FieldValue::Text(text)))
            }
            (value, _) => value,
        }
    }

    fn lookup(fields: &Map<String, Value>, name: &str) -> Result<Value, AccessError> {
        fields
            .get(name)
            .cloned()
            .ok_or_else(|| AccessError::NoSuchField {
                name: name.to_string(),
            })
    }
}

impl<T> ModelBackend for SerdeBackend<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn get(&self, name: &str) -> Result<Option<FieldValue>, AccessError> {
        let fields = self.fields()?;
        let value = Self::lookup(&fields, name)?;
        Ok(self.read(name, &value))
    }

    fn set(&mut self, name: &str, value: Option<FieldValue>) -> Result<(), AccessError> {
        let mut fields = self.fields()?;
        if !fields.contains_key(name) {
            return Err(AccessError::NoSuchField {
                name: name.to_string(),
            });
        }
        if let Some(FieldValue::Number(n)) = value {
            if !n.is_finite() {
                return Err(AccessError::Serialization(format!(
                    "{n} has no JSON representation"
                )));
            }
        }
        let json = value.as_ref().map(FieldValue::to_json).unwrap_or(Value::Null);
        fields.insert(name.to_string(), json);
        self.object = serde_json::from_value(Value::Object(fields))
            .map_err(|e| AccessError::Deserialization(e.to_string()))?;
        if let Some(value) = &value {
            self.written.insert(name.to_string(), value.field_type());
        }
        Ok(())
    }

    fn type_of(&self, name: &str) -> Result<FieldType, AccessError> {
        let fields = self.fields()?;
        let value = Self::lookup(&fields, name)?;
        self.read(name, &value)
            .map(|v| v.field_type())
            .or_else(|| self.type_hints.get(name).copied())
            .ok_or_else(|| AccessError::UnknownType {
                name: name.to_string(),
            })
    }

    fn as_any(&self) -> &dyn Any {
        &self.object
    }
}
