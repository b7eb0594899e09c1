//! Generic nested values
//!
//! A [`Value`] is the input side of the mapping: scalars become text
//! content, objects become elements (keys prefixed with `@` become
//! attributes), arrays become repeated sibling elements.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Prefix marking an object key as an XML attribute
pub const ATTRIBUTE_PREFIX: &str = "@";

/// Check whether an object key designates an attribute
pub fn is_attribute_key(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

/// Strip the attribute prefix from a key (`@id` -> `id`)
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_PREFIX)
}

/// A generic nested value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum Value {
    /// Text; any primitive is kept in its string form
    Scalar(String),
    /// Ordered mapping of keys to values
    Object(IndexMap<String, Value>),
    /// Ordered sequence of values
    Array(Vec<Value>),
}

impl Value {
    /// Parse JSON text into a value
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str::<JsonValue>(text)?.into())
    }

    /// Create a scalar value
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    /// Create an empty object
    pub fn object() -> Self {
        Value::Object(IndexMap::new())
    }

    /// Insert an entry, turning `self` into an object builder
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Get the scalar text, if this is a scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get the object entries, if this is an object
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up an object entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Scalar(String::new()),
            JsonValue::String(s) => Value::Scalar(s),
            JsonValue::Bool(b) => Value::Scalar(b.to_string()),
            JsonValue::Number(n) => Value::Scalar(n.to_string()),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(s) => JsonValue::String(s),
            Value::Array(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Object(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
        }
    }
}
