//! Schema inference from a sample XML document

use super::{InferredSchema, SchemaInferrer};
use crate::documents::{Document, Element};
use crate::error::Result;
use crate::limits::Limits;
use crate::schema::{FieldSchema, FieldType};
use indexmap::IndexMap;

/// Infers fields from an example document.
///
/// Only the root's children are described; the root tag itself is reported
/// as [`InferredSchema::root_name`]. Sibling elements sharing a tag collapse
/// into one array field shaped after the first of them; later siblings with
/// a different shape are not merged.
#[derive(Debug, Clone, Default)]
pub struct ExampleSchemaInferrer {
    limits: Limits,
}

impl ExampleSchemaInferrer {
    /// Create an inferrer with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Describe one element: attributes first, then grouped children
    fn fields_of(&self, node: &Element) -> FieldSchema {
        let mut properties: Vec<FieldSchema> = node
            .attributes
            .keys()
            .map(|name| FieldSchema::attribute(name, FieldType::String))
            .collect();
        properties.extend(self.grouped_children(node));

        let field_type = if node.has_element_children() {
            FieldType::Object
        } else {
            FieldType::String
        };
        FieldSchema::new(node.name(), field_type, properties)
    }

    fn grouped_children(&self, node: &Element) -> Vec<FieldSchema> {
        let mut groups: IndexMap<&str, Vec<&Element>> = IndexMap::new();
        for child in node.child_elements() {
            groups.entry(child.name()).or_default().push(child);
        }

        groups
            .into_iter()
            .map(|(name, siblings)| {
                let first = self.fields_of(siblings[0]);
                if siblings.len() > 1 {
                    FieldSchema::array(name, first.properties.unwrap_or_default())
                } else {
                    first
                }
            })
            .collect()
    }
}

impl SchemaInferrer for ExampleSchemaInferrer {
    fn input_label(&self) -> &'static str {
        "XML Example"
    }

    fn limits(&self) -> &Limits {
        &self.limits
    }

    fn infer_document(&self, doc: &Document) -> Result<InferredSchema> {
        let root = doc.require_root("XML")?;
        let fields = self.grouped_children(root);
        tracing::debug!(root = root.name(), fields = fields.len(), "inferred fields from example");

        Ok(InferredSchema {
            root_name: Some(root.name().to_string()),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn infer(xml: &str) -> Vec<FieldSchema> {
        ExampleSchemaInferrer::new().infer(xml).unwrap()
    }

    #[test]
    fn test_repeated_siblings_collapse_to_array() {
        let fields = infer("<root><item>A</item><item>B</item><item>C</item></root>");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "item");
        assert_eq!(fields[0].field_type, FieldType::Array);
        assert_eq!(fields[0].of, Some(FieldType::Object));
    }

    #[test]
    fn test_single_leaf_is_not_wrapped() {
        let fields = infer("<root><name>X</name></root>");
        assert_eq!(fields, vec![FieldSchema::string("name")]);
    }

    #[test]
    fn test_nested_structure() {
        let xml = r#"
            <order id="7">
                <customer vip="yes">
                    <name>Alice</name>
                    <email>a@example.com</email>
                </customer>
                <line sku="a"><qty>1</qty></line>
                <line sku="b"><qty>2</qty><note>gift</note></line>
                <total currency="EUR">9.50</total>
            </order>"#;
        let fields = serde_json::to_value(infer(xml)).unwrap();
        assert_eq!(
            fields,
            json!([
                {
                    "name": "customer",
                    "type": "object",
                    "properties": [
                        {"name": "@vip", "type": "string"},
                        {"name": "name", "type": "string"},
                        {"name": "email", "type": "string"}
                    ]
                },
                {
                    "name": "line",
                    "type": "array",
                    "of": "object",
                    "properties": [
                        {"name": "@sku", "type": "string"},
                        {"name": "qty", "type": "string"}
                    ]
                },
                {
                    "name": "total",
                    "type": "string",
                    "properties": [
                        {"name": "@currency", "type": "string"}
                    ]
                }
            ])
        );
    }

    #[test]
    fn test_group_order_is_first_seen() {
        let fields = infer("<r><b/><a/><b/><c/></r>");
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(fields[0].is_array());
        assert!(!fields[1].is_array());
    }

    #[test]
    fn test_root_name_and_attributes_not_in_fields() {
        let schema = ExampleSchemaInferrer::new()
            .infer_schema(r#"<person id="1"><name>A</name></person>"#)
            .unwrap();
        assert_eq!(schema.root_name.as_deref(), Some("person"));
        assert_eq!(schema.fields, vec![FieldSchema::string("name")]);
    }

    #[test]
    fn test_missing_root() {
        let result = ExampleSchemaInferrer::new().infer("<!-- nothing -->");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
