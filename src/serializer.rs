//! Value to XML serialization
//!
//! Walks a [`Value`] depth-first and writes elements with the quick-xml
//! writer:
//!
//! - an object becomes one element; `@`-prefixed keys become its attributes
//!   and the remaining keys its child elements, in mapping order
//! - an array becomes one sibling element per member, all sharing the tag of
//!   the array itself (no wrapping element)
//! - a scalar becomes an element with text content
//!
//! ```rust
//! use xmlmapper::{serialize, Value};
//!
//! let person = Value::object().with("@id", "1").with("name", "Alice");
//! let xml = serialize("person", &person).unwrap();
//! assert_eq!(xml, r#"<person id="1"><name>Alice</name></person>"#);
//! ```

use crate::error::{Error, Result};
use crate::names::validate_name;
use crate::value::{attribute_name, is_attribute_key, Value};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Output options for the serializer
#[derive(Debug, Clone, Default)]
pub struct SerializerConfig {
    /// Emit an `<?xml version="1.0" encoding="UTF-8"?>` declaration
    xml_declaration: bool,
    /// Indentation width; `None` writes everything on one line
    indent: Option<usize>,
}

impl SerializerConfig {
    /// Compact output without declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Full document output: declaration and two-space indentation
    pub fn document() -> Self {
        Self {
            xml_declaration: true,
            indent: Some(2),
        }
    }

    /// Check whether a declaration is written
    pub fn xml_declaration(&self) -> bool {
        self.xml_declaration
    }

    /// Get indentation width
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Set whether a declaration is written
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }

    /// Set indentation width
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }
}

/// Serializer from [`Value`] trees to XML text
#[derive(Debug, Clone, Default)]
pub struct XmlSerializer {
    config: SerializerConfig,
}

impl XmlSerializer {
    /// Create a serializer
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serialize `value` as a document whose root element is `root_name`.
    ///
    /// A document has exactly one root, so a top-level array is rejected;
    /// use [`serialize_fragment`](Self::serialize_fragment) for siblings.
    pub fn serialize(&self, root_name: &str, value: &Value) -> Result<String> {
        if let Value::Array(items) = value {
            return Err(Error::InvalidValue(format!(
                "document root <{}> cannot be an array of {} items",
                root_name,
                items.len()
            )));
        }
        tracing::debug!(root = root_name, kind = value.kind(), "serializing document");
        self.write(root_name, value, self.config.xml_declaration)
    }

    /// Serialize `value` as a fragment; an array yields sibling elements
    pub fn serialize_fragment(&self, tag: &str, value: &Value) -> Result<String> {
        self.write(tag, value, false)
    }

    fn write(&self, tag: &str, value: &Value, declaration: bool) -> Result<String> {
        let mut writer = match self.config.indent {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };

        if declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(write_error)?;
        }
        write_value(&mut writer, tag, value)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::InvalidValue(format!("serialized XML is not UTF-8: {}", e)))
    }
}

/// Serialize `value` under `root_name` with compact output
pub fn serialize(root_name: &str, value: &Value) -> Result<String> {
    XmlSerializer::default().serialize(root_name, value)
}

fn write_value<W: Write>(writer: &mut Writer<W>, tag: &str, value: &Value) -> Result<()> {
    match value {
        Value::Object(entries) => {
            validate_name(tag)?;
            let mut start = BytesStart::new(tag);
            let mut has_elements = false;

            for (key, entry) in entries {
                match attribute_name(key) {
                    Some(attr) => {
                        let text = entry.as_str().ok_or_else(|| {
                            Error::InvalidValue(format!(
                                "attribute '{}' of <{}> must be a scalar, found {}",
                                key,
                                tag,
                                entry.kind()
                            ))
                        })?;
                        validate_name(attr)?;
                        validate_text(text, key, tag)?;
                        start.push_attribute((attr, text));
                    }
                    None => has_elements = true,
                }
            }

            if !has_elements {
                return writer.write_event(Event::Empty(start)).map_err(write_error);
            }

            writer.write_event(Event::Start(start)).map_err(write_error)?;
            for (key, entry) in entries.iter().filter(|(key, _)| !is_attribute_key(key)) {
                write_value(writer, key, entry)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(write_error)
        }
        Value::Array(items) => {
            for item in items {
                write_value(writer, tag, item)?;
            }
            Ok(())
        }
        Value::Scalar(text) => {
            validate_name(tag)?;
            if text.is_empty() {
                return writer
                    .write_event(Event::Empty(BytesStart::new(tag)))
                    .map_err(write_error);
            }
            validate_text(text, tag, tag)?;
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(write_error)?;
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(write_error)
        }
    }
}

/// Reject characters outside the XML 1.0 `Char` production
fn validate_text(text: &str, key: &str, tag: &str) -> Result<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(Error::InvalidValue(format!(
            "value of '{}' in <{}> contains U+{:04X}, which XML 1.0 does not allow",
            key, tag, c as u32
        ))),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn write_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}
