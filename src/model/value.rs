//! Values stored in a form model and their type tags.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value held by a backing model.
///
/// An absent value ("null") is modelled as `Option::None` at every API
/// boundary rather than as a variant, so `Option<FieldValue>` is the type
/// that flows through reads and writes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    List(Vec<String>),
}

/// Type tag of a [`FieldValue`], used by field controllers to pick a coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Integer,
    Number,
    Bool,
    Date,
    Time,
    List,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Time => "time",
            Self::List => "list",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Integer(_) => FieldType::Integer,
            Self::Number(_) => FieldType::Number,
            Self::Bool(_) => FieldType::Bool,
            Self::Date(_) => FieldType::Date,
            Self::Time(_) => FieldType::Time,
            Self::List(_) => FieldType::List,
        }
    }

    /// Empty text and empty lists count as "no input" for the required check.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Length used by the length rules: characters for text, items for lists.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Text(text) => Some(text.chars().count()),
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert into the loosely typed JSON representation.
    ///
    /// Dates and times become ISO-8601 strings in chrono's serde format, so
    /// the round trip back through [`FieldValue::from_json`] yields `Text`;
    /// [`FieldValue::parse_temporal`] restores the native type.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Integer(n) => Value::from(*n),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Self::Time(time) => Value::String(time.format("%H:%M:%S%.f").to_string()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }

    /// Parse an ISO-8601 date or time written by [`FieldValue::to_json`].
    ///
    /// Returns `None` for any other target type or unparsable text.
    pub fn parse_temporal(text: &str, target: FieldType) -> Option<Self> {
        match target {
            FieldType::Date => text.parse::<NaiveDate>().ok().map(Self::Date),
            FieldType::Time => text.parse::<NaiveTime>().ok().map(Self::Time),
            _ => None,
        }
    }

    /// Convert from JSON. `null`, objects and mixed arrays have no field value.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Null | Value::Object(_) => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Number),
            },
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Time(time) => write!(f, "{}", time.format("%H:%M")),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emptiness_only_applies_to_text_and_lists() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::from(" ").is_empty());
        assert!(!FieldValue::Integer(0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn json_numbers_prefer_integers() {
        assert_eq!(FieldValue::from_json(&json!(7)), Some(FieldValue::Integer(7)));
        assert_eq!(FieldValue::from_json(&json!(2.5)), Some(FieldValue::Number(2.5)));
        assert_eq!(FieldValue::from_json(&json!(null)), None);
    }

    #[test]
    fn json_arrays_must_hold_strings() {
        assert_eq!(
            FieldValue::from_json(&json!(["a", "b"])),
            Some(FieldValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(FieldValue::from_json(&json!(["a", 1])), None);
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(FieldValue::Date(date).to_json(), json!("2024-02-29"));
    }

    #[test]
    fn times_keep_sub_second_precision() {
        let time = NaiveTime::from_hms_micro_opt(23, 59, 1, 500).unwrap();
        let json = FieldValue::Time(time).to_json();

        assert_eq!(json, json!("23:59:01.000500"));
        assert_eq!(
            FieldValue::parse_temporal("23:59:01.000500", FieldType::Time),
            Some(FieldValue::Time(time))
        );
        assert_eq!(FieldValue::parse_temporal("soon", FieldType::Time), None);
        assert_eq!(FieldValue::parse_temporal("2024-02-29", FieldType::Text), None);
    }

    #[test]
    fn value_serializes_with_type_tag() {
        let value = FieldValue::Integer(3);
        let encoded = serde_json::to_string(&value).unwrap();
        assert_eq!(encoded, r#"{"type":"Integer","value":3}"#);
        let decoded: FieldValue = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
