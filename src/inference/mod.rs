//! Field schema inference
//!
//! This module infers [`FieldSchema`] lists describing expected input shape.
//!
//! Supported sources:
//! - Example: a sample XML document; repeated sibling tags become arrays
//! - Xsd: an XML Schema document; named complex types are resolved and
//!   `maxOccurs` marks arrays

mod example;
mod xsd;

pub use example::ExampleSchemaInferrer;
pub use xsd::{XsdInferenceConfig, XsdSchemaInferrer};

use crate::documents::Document;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::schema::FieldSchema;
use serde::Serialize;

/// Result of inferring a schema from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferredSchema {
    /// Name of the element that wraps the described fields, when discoverable
    pub root_name: Option<String>,
    /// The described fields
    pub fields: Vec<FieldSchema>,
}

/// Trait for schema inferrers
pub trait SchemaInferrer {
    /// Human readable name of the input this inferrer consumes
    fn input_label(&self) -> &'static str;

    /// Limits used when parsing input text
    fn limits(&self) -> &Limits;

    /// Infer fields and root name from a parsed document
    fn infer_document(&self, doc: &Document) -> Result<InferredSchema>;

    /// Parse `text` and infer fields and root name
    fn infer_schema(&self, text: &str) -> Result<InferredSchema> {
        let doc = parse_required(text, self.input_label(), self.limits())?;
        self.infer_document(&doc)
    }

    /// Parse `text` and infer its fields
    fn infer(&self, text: &str) -> Result<Vec<FieldSchema>> {
        self.infer_schema(text).map(|schema| schema.fields)
    }
}

/// Source kind for selecting an inferrer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaSource {
    /// A sample XML document
    #[default]
    Example,
    /// An XSD document
    Xsd,
}

/// Create an inferrer by source kind
pub fn create_inferrer(source: SchemaSource) -> Box<dyn SchemaInferrer> {
    match source {
        SchemaSource::Example => Box::new(ExampleSchemaInferrer::new()),
        SchemaSource::Xsd => Box::new(XsdSchemaInferrer::new()),
    }
}

/// Reject blank input before parsing, then parse
pub(crate) fn parse_required(text: &str, label: &str, limits: &Limits) -> Result<Document> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} Input is required", label)));
    }
    Document::parse(text, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_source_default() {
        assert_eq!(SchemaSource::default(), SchemaSource::Example);
    }

    #[test]
    fn test_create_inferrer() {
        let example = create_inferrer(SchemaSource::Example);
        assert_eq!(example.input_label(), "XML Example");

        let xsd = create_inferrer(SchemaSource::Xsd);
        assert_eq!(xsd.input_label(), "XSD");
    }

    #[test]
    fn test_blank_input_fails_before_parsing() {
        for source in [SchemaSource::Example, SchemaSource::Xsd] {
            let inferrer = create_inferrer(source);
            assert!(matches!(inferrer.infer(""), Err(Error::InvalidInput(_))));
            assert!(matches!(inferrer.infer("  \n\t"), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_malformed_input_is_parse_error() {
        for source in [SchemaSource::Example, SchemaSource::Xsd] {
            let inferrer = create_inferrer(source);
            assert!(matches!(inferrer.infer("<a><b></a>"), Err(Error::Parse(_))));
        }
    }

    #[test]
    fn test_missing_root_is_invalid_input() {
        for source in [SchemaSource::Example, SchemaSource::Xsd] {
            let inferrer = create_inferrer(source);
            let result = inferrer.infer("<?xml version=\"1.0\"?>");
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }
}
