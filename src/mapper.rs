//! Example- and schema-driven XML generation
//!
//! An [`XmlMapper`] is built from one source document, an XML example or an
//! XSD, and then:
//!
//! 1. describes the input it expects through [`XmlMapper::fields`]
//! 2. turns input shaped like that description into XML under the root
//!    element discovered from the source ([`XmlMapper::generate`])

use crate::error::{Error, Result};
use crate::inference::{
    ExampleSchemaInferrer, InferredSchema, SchemaInferrer, SchemaSource, XsdSchemaInferrer,
};
use crate::schema::{template_for, FieldSchema};
use crate::serializer::{SerializerConfig, XmlSerializer};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Input key holding the XML example
pub const XML_EXAMPLE_KEY: &str = "xml_example";

/// Input key holding the XSD document
pub const XSD_SCHEMA_KEY: &str = "xsd_schema";

/// Output key holding the generated XML
pub const XML_OUTPUT_KEY: &str = "xml_output";

/// Generated XML, serialized as `{"xml_output": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlOutput {
    /// The XML document text
    pub xml_output: String,
}

/// Maps input values to XML shaped after an example or a schema
#[derive(Debug, Clone)]
pub struct XmlMapper {
    source: SchemaSource,
    root_name: String,
    fields: Vec<FieldSchema>,
    serializer: XmlSerializer,
}

impl XmlMapper {
    /// Build a mapper from an XML example document
    pub fn from_example(xml_example: &str) -> Result<Self> {
        Self::from_example_with(xml_example, &ExampleSchemaInferrer::new())
    }

    /// Build a mapper from an XML example with a configured inferrer
    pub fn from_example_with(xml_example: &str, inferrer: &ExampleSchemaInferrer) -> Result<Self> {
        let schema = inferrer.infer_schema(xml_example)?;
        Self::from_inferred(SchemaSource::Example, schema)
    }

    /// Build a mapper from an XSD document
    pub fn from_schema(xsd_schema: &str) -> Result<Self> {
        Self::from_schema_with(xsd_schema, &XsdSchemaInferrer::new())
    }

    /// Build a mapper from an XSD document with a configured inferrer
    pub fn from_schema_with(xsd_schema: &str, inferrer: &XsdSchemaInferrer) -> Result<Self> {
        let schema = inferrer.infer_schema(xsd_schema)?;
        Self::from_inferred(SchemaSource::Xsd, schema)
    }

    fn from_inferred(source: SchemaSource, schema: InferredSchema) -> Result<Self> {
        let root_name = schema
            .root_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput("source document names no root element".to_string())
            })?;

        Ok(Self {
            source,
            root_name,
            fields: schema.fields,
            serializer: XmlSerializer::new(SerializerConfig::document()),
        })
    }

    /// Set the output options
    pub fn with_serializer_config(mut self, config: SerializerConfig) -> Self {
        self.serializer = XmlSerializer::new(config);
        self
    }

    /// Kind of document the mapper was built from
    pub fn source(&self) -> SchemaSource {
        self.source
    }

    /// Root element name of generated documents
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Description of the expected input
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Description of the produced output
    pub fn output_fields() -> Vec<FieldSchema> {
        vec![FieldSchema::string(XML_OUTPUT_KEY)]
    }

    /// A sample input matching [`fields`](Self::fields)
    pub fn template(&self) -> Value {
        template_for(&self.fields)
    }

    /// Input key that carries the source document itself
    fn source_key(&self) -> &'static str {
        match self.source {
            SchemaSource::Example => XML_EXAMPLE_KEY,
            SchemaSource::Xsd => XSD_SCHEMA_KEY,
        }
    }

    /// Generate XML from `input`.
    ///
    /// For an example, the input's entries are the children of the root.
    /// For a schema, the described field is the root itself, so the input's
    /// root entry holds the root's content; input without that entry is
    /// taken as the root content directly. When the root declares a child
    /// of its own name, a lone entry of that name is that child.
    pub fn generate(&self, input: &Value) -> Result<XmlOutput> {
        let Value::Object(entries) = input else {
            return Err(Error::InvalidValue(format!(
                "input must be an object, found {}",
                input.kind()
            )));
        };

        let mut entries = entries.clone();
        entries.shift_remove(self.source_key());

        let content = match self.source {
            SchemaSource::Xsd
                if entries.len() == 1
                    && entries.contains_key(&self.root_name)
                    && !self.root_has_child(&self.root_name) =>
            {
                entries.shift_remove(&self.root_name).unwrap_or_else(Value::object)
            }
            _ => Value::Object(entries),
        };

        let xml_output = self.serializer.serialize(&self.root_name, &content)?;
        tracing::debug!(root = %self.root_name, bytes = xml_output.len(), "generated XML");
        Ok(XmlOutput { xml_output })
    }

    /// Whether the root field declares a nested field named `name`
    fn root_has_child(&self, name: &str) -> bool {
        self.fields
            .first()
            .map(|root| root.property(name).is_some())
            .unwrap_or(false)
    }
}
