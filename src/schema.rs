//! Field schema descriptions
//!
//! A [`FieldSchema`] tree describes the shape of input expected for one XML
//! subtree: element and attribute names, their types, nesting, and whether
//! an element repeats. It is the output of both inferrers and serializes to
//! the JSON shape an integration builder consumes:
//!
//! ```json
//! { "name": "item", "type": "array", "of": "object", "properties": [ ... ] }
//! ```

use crate::value::{Value, ATTRIBUTE_PREFIX};
use serde::{Deserialize, Serialize};

/// Type of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Text leaf
    String,
    /// Element with attributes and/or child elements
    Object,
    /// Repeated element
    Array,
    /// A declared simple type name carried over from a schema (e.g. `int`)
    Declared(String),
}

impl FieldType {
    /// The type name as serialized
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Declared(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from(name.as_str())
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "string" => FieldType::String,
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            other => FieldType::Declared(other.to_string()),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural description of one element or attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Element name, or `@`-prefixed attribute name
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Member type, only for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of: Option<FieldType>,
    /// Nested fields (attributes first, then child elements)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<FieldSchema>>,
}

impl FieldSchema {
    /// Create a field of any non-array type.
    ///
    /// Plain string leaves without nested fields carry no `properties`.
    pub fn new(name: impl Into<String>, field_type: FieldType, properties: Vec<FieldSchema>) -> Self {
        let properties = match field_type {
            FieldType::Object => Some(properties),
            _ if properties.is_empty() => None,
            _ => Some(properties),
        };
        Self {
            name: name.into(),
            field_type,
            of: None,
            properties,
        }
    }

    /// Create a text leaf
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String, Vec::new())
    }

    /// Create an object field
    pub fn object(name: impl Into<String>, properties: Vec<FieldSchema>) -> Self {
        Self::new(name, FieldType::Object, properties)
    }

    /// Create a repeated field whose members have `properties`
    pub fn array(name: impl Into<String>, properties: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Array,
            of: Some(FieldType::Object),
            properties: Some(properties),
        }
    }

    /// Create an attribute field; `name` is given without the `@` prefix
    pub fn attribute(name: &str, field_type: FieldType) -> Self {
        Self::new(format!("{}{}", ATTRIBUTE_PREFIX, name), field_type, Vec::new())
    }

    /// Check whether this field describes an attribute
    pub fn is_attribute(&self) -> bool {
        self.name.starts_with(ATTRIBUTE_PREFIX)
    }

    /// Check whether this field repeats
    pub fn is_array(&self) -> bool {
        self.field_type == FieldType::Array
    }

    /// Nested fields (empty for leaves)
    pub fn properties(&self) -> &[FieldSchema] {
        self.properties.as_deref().unwrap_or(&[])
    }

    /// Find a nested field by name
    pub fn property(&self, name: &str) -> Option<&FieldSchema> {
        self.properties().iter().find(|p| p.name == name)
    }

    /// Build a sample value shaped like this field.
    ///
    /// Leaves are filled with their own name; an array gets a single member.
    pub fn template(&self) -> Value {
        match self.field_type {
            FieldType::Array => Value::Array(vec![Self::template_members(self.properties(), &self.name)]),
            _ => Self::template_members(self.properties(), &self.name),
        }
    }

    // A text leaf that also carries attributes becomes an object of its
    // attributes; the value model has no slot for its text.
    fn template_members(properties: &[FieldSchema], leaf_text: &str) -> Value {
        if properties.is_empty() {
            Value::scalar(leaf_text.trim_start_matches(ATTRIBUTE_PREFIX))
        } else {
            template_for(properties)
        }
    }
}

/// Build a sample object value with one entry per field
pub fn template_for(fields: &[FieldSchema]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|field| (field.name.clone(), field.template()))
            .collect(),
    )
}
