//! # xmlmapper
//!
//! Map generic nested values to XML, and infer the field schema such values
//! should follow from a sample XML document or from an XSD.
//!
//! ## Features
//!
//! - Value to XML serialization with the `@attribute` naming convention
//! - Field schema inference from XML examples (repeated tags become arrays)
//! - Field schema inference from XSD documents, resolving named complex types
//! - Example- and schema-driven generation of complete XML documents
//!
//! ## Example
//!
//! ```rust
//! use xmlmapper::{SerializerConfig, Value, XmlMapper};
//!
//! let mapper = XmlMapper::from_example("<person id=\"1\"><name>Bob</name></person>")?
//!     .with_serializer_config(SerializerConfig::new());
//! assert_eq!(mapper.fields()[0].name, "name");
//!
//! let input = Value::object().with("@id", "2").with("name", "Alice");
//! let output = mapper.generate(&input)?;
//! assert_eq!(output.xml_output, r#"<person id="2"><name>Alice</name></person>"#);
//! # Ok::<(), xmlmapper::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// XML names and documents
pub mod names;
pub mod namespaces;
pub mod documents;

// Data shapes
pub mod value;
pub mod schema;

// Conversion and inference
pub mod serializer;
pub mod inference;
pub mod mapper;

// Re-exports for convenience
pub use error::{Error, Result};
pub use inference::{
    create_inferrer, ExampleSchemaInferrer, InferredSchema, SchemaInferrer, SchemaSource,
    XsdInferenceConfig, XsdSchemaInferrer,
};
pub use mapper::{XmlMapper, XmlOutput};
pub use schema::{FieldSchema, FieldType};
pub use serializer::{serialize, SerializerConfig, XmlSerializer};
pub use value::Value;

/// Version of the xmlmapper library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_1_0_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XSD 1.1 namespace
pub const XSD_1_1_NAMESPACE: &str = "http://www.w3.org/2009/XMLSchema";

/// Namespaces recognised as XML Schema
pub const XSD_NAMESPACES: &[&str] = &[XSD_1_0_NAMESPACE, XSD_1_1_NAMESPACE];

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
