//! Schema inference from an XSD document
//!
//! The first element declaration of the schema is described, recursively:
//!
//! - a `type` naming a complexType defined in the same document is resolved
//!   and that definition's content is used; resolution re-enters the same
//!   step, so chains of named types resolve transitively
//! - otherwise the element's own anonymous complexType is inspected:
//!   elements inside `sequence` (also `all` / `choice`) become nested
//!   fields, `attribute` declarations become `@`-prefixed fields, and the
//!   same applies inside simpleContent/complexContent derivations
//! - `maxOccurs` other than `1` turns the element into an array
//!
//! A `type` naming nothing in the document (builtins such as `xs:string`,
//! or a dangling reference) leaves the element to its local content, which
//! usually means a plain string field.

use super::{InferredSchema, SchemaInferrer};
use crate::documents::{Document, Element};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::local_name;
use crate::schema::{FieldSchema, FieldType};
use crate::XSD_NAMESPACES;

/// Options for XSD inference
#[derive(Debug, Clone, Default)]
pub struct XsdInferenceConfig {
    /// Fail on `type` references that name no type in the document
    strict_types: bool,
}

impl XsdInferenceConfig {
    /// Create a configuration with graceful type resolution
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dangling type references are errors
    pub fn strict_types(&self) -> bool {
        self.strict_types
    }

    /// Set whether dangling type references are errors
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }
}

/// Infers fields from an XSD document
#[derive(Debug, Clone, Default)]
pub struct XsdSchemaInferrer {
    config: XsdInferenceConfig,
    limits: Limits,
}

impl XsdSchemaInferrer {
    /// Create an inferrer with graceful type resolution and default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: XsdInferenceConfig) -> Self {
        Self {
            config,
            limits: Limits::default(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &XsdInferenceConfig {
        &self.config
    }
}

impl SchemaInferrer for XsdSchemaInferrer {
    fn input_label(&self) -> &'static str {
        "XSD"
    }

    fn limits(&self) -> &Limits {
        &self.limits
    }

    fn infer_document(&self, doc: &Document) -> Result<InferredSchema> {
        doc.require_root("XSD")?;

        let Some(element) = doc.find_first(|e| is_xsd(e, "element")) else {
            tracing::debug!("schema declares no element");
            return Ok(InferredSchema {
                root_name: None,
                fields: Vec::new(),
            });
        };

        let mut walker = Walker {
            doc,
            config: &self.config,
            limits: &self.limits,
            resolving: Vec::new(),
        };
        let field = walker.fields_of(element)?;
        let root_name = element
            .get_attribute("name")
            .map(str::to_string)
            .or_else(|| field.as_ref().map(|f| f.name.clone()));
        tracing::debug!(root = ?root_name, "inferred fields from schema");

        Ok(InferredSchema {
            root_name,
            fields: field.into_iter().collect(),
        })
    }
}

/// Recursive walk over one schema document
struct Walker<'a> {
    doc: &'a Document,
    config: &'a XsdInferenceConfig,
    limits: &'a Limits,
    /// Definitions currently being resolved, outermost first
    resolving: Vec<String>,
}

impl<'a> Walker<'a> {
    fn fields_of(&mut self, node: &'a Element) -> Result<Option<FieldSchema>> {
        let is_element = is_xsd(node, "element");
        let name = node.get_attribute("name");
        if name.is_none() && !is_element {
            return Ok(None);
        }

        if is_element && name.is_none() {
            if let Some(reference) = node.get_attribute("ref") {
                if let Some(global) = self.find_named("element", local_name(reference)) {
                    let key = format!("element:{}", local_name(reference));
                    if let Some(field) = self.resolve(&key, global)? {
                        return Ok(Some(adopt(node, field)));
                    }
                }
            }
        }

        if let Some(type_ref) = node.get_attribute("type") {
            let type_name = local_name(type_ref);
            match self.find_named("complexType", type_name) {
                Some(definition) => {
                    let key = format!("complexType:{}", type_name);
                    if let Some(field) = self.resolve(&key, definition)? {
                        return Ok(Some(adopt(node, field)));
                    }
                }
                None => self.check_dangling(node, type_ref)?,
            }
        }

        let properties = self.local_properties(node)?;

        let field_type = if is_xsd(node, "complexType") || !properties.is_empty() {
            FieldType::Object
        } else {
            FieldType::String
        };

        let name = name.unwrap_or_default();
        if is_repeated(node) {
            Ok(Some(FieldSchema::array(name, properties)))
        } else {
            Ok(Some(FieldSchema::new(name, field_type, properties)))
        }
    }

    /// Enter a named definition unless it is already being resolved
    fn resolve(&mut self, key: &str, definition: &'a Element) -> Result<Option<FieldSchema>> {
        if self.resolving.iter().any(|k| k == key) {
            tracing::warn!(definition = key, "recursive definition not expanded again");
            return Ok(None);
        }
        self.limits.check_type_depth(self.resolving.len() + 1)?;

        self.resolving.push(key.to_string());
        let result = self.fields_of(definition);
        self.resolving.pop();
        result
    }

    /// Nested fields from the node's own complexType content
    fn local_properties(&mut self, node: &'a Element) -> Result<Vec<FieldSchema>> {
        let mut properties = Vec::new();

        let definitions: Vec<&'a Element> = if is_xsd(node, "complexType") {
            vec![node]
        } else {
            node.child_elements()
                .iter()
                .filter(|child| is_xsd(child, "complexType"))
                .collect()
        };

        for definition in definitions {
            self.collect_content(definition, &mut properties)?;
        }

        Ok(properties)
    }

    /// Content of a complexType, or of a simpleContent/complexContent derivation
    fn collect_content(
        &mut self,
        definition: &'a Element,
        properties: &mut Vec<FieldSchema>,
    ) -> Result<()> {
        for child in definition.child_elements() {
            if is_compositor(child) {
                self.collect_particles(child, properties)?;
            } else if is_xsd(child, "attribute") {
                properties.extend(attribute_field(child));
            } else if is_xsd(child, "simpleContent") || is_xsd(child, "complexContent") {
                for derivation in child.child_elements() {
                    if is_xsd(derivation, "extension") || is_xsd(derivation, "restriction") {
                        self.collect_content(derivation, properties)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn collect_particles(
        &mut self,
        compositor: &'a Element,
        properties: &mut Vec<FieldSchema>,
    ) -> Result<()> {
        for particle in compositor.child_elements() {
            if is_xsd(particle, "element") {
                properties.extend(self.fields_of(particle)?);
            } else if is_compositor(particle) {
                self.collect_particles(particle, properties)?;
            }
        }
        Ok(())
    }

    fn find_named(&self, kind: &str, name: &str) -> Option<&'a Element> {
        self.doc
            .find_first(|e| is_xsd(e, kind) && e.get_attribute("name") == Some(name))
    }

    /// A `type` that names no complexType: builtin, simpleType, or dangling
    fn check_dangling(&self, node: &Element, type_ref: &str) -> Result<()> {
        let builtin = node
            .namespaces
            .resolve(type_ref)
            .map(|qname| {
                qname.matches(XSD_NAMESPACES, &qname.local_name)
                    && is_builtin_type(&qname.local_name)
            })
            .unwrap_or(false);
        if builtin || self.find_named("simpleType", local_name(type_ref)).is_some() {
            return Ok(());
        }

        if self.config.strict_types {
            return Err(Error::UnresolvedTypeReference(format!(
                "type '{}' of '{}' is not defined in the schema",
                type_ref,
                node.get_attribute("name").unwrap_or_default()
            )));
        }
        tracing::warn!(type_ref, "unresolved type reference, using local content");
        Ok(())
    }
}

/// Give a resolved definition the referencing element's name and cardinality
fn adopt(node: &Element, resolved: FieldSchema) -> FieldSchema {
    let name = node
        .get_attribute("name")
        .map(str::to_string)
        .unwrap_or_else(|| resolved.name.clone());

    if is_repeated(node) {
        FieldSchema::array(name, resolved.properties.unwrap_or_default())
    } else {
        FieldSchema { name, ..resolved }
    }
}

fn attribute_field(node: &Element) -> Option<FieldSchema> {
    let name = node
        .get_attribute("name")
        .or_else(|| node.get_attribute("ref"))?;
    let field_type = node
        .get_attribute("type")
        .map(|t| FieldType::from(local_name(t)))
        .unwrap_or(FieldType::String);
    Some(FieldSchema::attribute(name, field_type))
}

/// Datatypes predefined in the XSD namespace (1.0 plus the 1.1 additions)
fn is_builtin_type(local: &str) -> bool {
    matches!(
        local,
        "string"
            | "normalizedString"
            | "token"
            | "language"
            | "Name"
            | "NCName"
            | "ID"
            | "IDREF"
            | "IDREFS"
            | "ENTITY"
            | "ENTITIES"
            | "NMTOKEN"
            | "NMTOKENS"
            | "boolean"
            | "decimal"
            | "integer"
            | "long"
            | "int"
            | "short"
            | "byte"
            | "nonNegativeInteger"
            | "positiveInteger"
            | "unsignedLong"
            | "unsignedInt"
            | "unsignedShort"
            | "unsignedByte"
            | "nonPositiveInteger"
            | "negativeInteger"
            | "float"
            | "double"
            | "duration"
            | "dayTimeDuration"
            | "yearMonthDuration"
            | "dateTime"
            | "dateTimeStamp"
            | "time"
            | "date"
            | "gYearMonth"
            | "gYear"
            | "gMonthDay"
            | "gDay"
            | "gMonth"
            | "hexBinary"
            | "base64Binary"
            | "anyURI"
            | "QName"
            | "NOTATION"
            | "anyType"
            | "anySimpleType"
            | "anyAtomicType"
    )
}

fn is_repeated(node: &Element) -> bool {
    node.get_attribute("maxOccurs")
        .map(|max| max.trim() != "1")
        .unwrap_or(false)
}

fn is_compositor(node: &Element) -> bool {
    is_xsd(node, "sequence") || is_xsd(node, "all") || is_xsd(node, "choice")
}

fn is_xsd(node: &Element, local: &str) -> bool {
    node.qname.matches(XSD_NAMESPACES, local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn infer(xsd: &str) -> serde_json::Value {
        let fields = XsdSchemaInferrer::new().infer(xsd).unwrap();
        serde_json::to_value(fields).unwrap()
    }

    #[test]
    fn test_anonymous_complex_type() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="person">
                <xs:complexType>
                  <xs:sequence>
                    <xs:element name="name" type="xs:string"/>
                    <xs:element name="phone" type="xs:string" maxOccurs="unbounded"/>
                  </xs:sequence>
                  <xs:attribute name="id" type="xs:int"/>
                  <xs:attribute name="status"/>
                </xs:complexType>
              </xs:element>
            </xs:schema>"#;
        assert_eq!(
            infer(xsd),
            json!([{
                "name": "person",
                "type": "object",
                "properties": [
                    {"name": "name", "type": "string"},
                    {"name": "phone", "type": "array", "of": "object", "properties": []},
                    {"name": "@id", "type": "int"},
                    {"name": "@status", "type": "string"}
                ]
            }])
        );
    }

    #[test]
    fn test_named_type_reference_resolves() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                       xmlns:tns="http://example.com/people"
                       targetNamespace="http://example.com/people">
              <xs:element name="person" type="tns:PersonType"/>
              <xs:complexType name="PersonType">
                <xs:sequence>
                  <xs:element name="first" type="xs:string"/>
                  <xs:element name="address" type="tns:AddressType" maxOccurs="3"/>
                </xs:sequence>
              </xs:complexType>
              <xs:complexType name="AddressType">
                <xs:sequence>
                  <xs:element name="city" type="xs:string"/>
                </xs:sequence>
                <xs:attribute name="kind" type="xs:string"/>
              </xs:complexType>
            </xs:schema>"#;
        assert_eq!(
            infer(xsd),
            json!([{
                "name": "person",
                "type": "object",
                "properties": [
                    {"name": "first", "type": "string"},
                    {
                        "name": "address",
                        "type": "array",
                        "of": "object",
                        "properties": [
                            {"name": "city", "type": "string"},
                            {"name": "@kind", "type": "string"}
                        ]
                    }
                ]
            }])
        );
    }

    #[test]
    fn test_max_occurs_overrides_simple_type() {
        let xsd = r#"
            <xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
              <xsd:element name="tag" type="xsd:string" maxOccurs="unbounded"/>
            </xsd:schema>"#;
        let fields = XsdSchemaInferrer::new().infer(xsd).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Array);
        assert_eq!(fields[0].of, Some(FieldType::Object));
    }

    #[test]
    fn test_max_occurs_one_is_not_array() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="tag" type="xs:string" maxOccurs="1"/>
            </xs:schema>"#;
        assert_eq!(infer(xsd), json!([{"name": "tag", "type": "string"}]));
    }

    #[test]
    fn test_dangling_reference_degrades() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="thing" type="Missing"/>
            </xs:schema>"#;
        assert_eq!(infer(xsd), json!([{"name": "thing", "type": "string"}]));
    }

    #[test]
    fn test_dangling_reference_strict() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="ok" type="xs:string"/>
              <xs:element name="thing" type="Missing"/>
            </xs:schema>"#;
        let inferrer =
            XsdSchemaInferrer::with_config(XsdInferenceConfig::new().with_strict_types(true));
        // The first element is a builtin and resolves fine.
        assert!(inferrer.infer(xsd).is_ok());

        let xsd = xsd.replace(r#"<xs:element name="ok" type="xs:string"/>"#, "");
        assert!(matches!(
            inferrer.infer(&xsd),
            Err(Error::UnresolvedTypeReference(_))
        ));
    }

    #[test]
    fn test_strict_rejects_unknown_xsd_type() {
        let inferrer =
            XsdSchemaInferrer::with_config(XsdInferenceConfig::new().with_strict_types(true));

        let prefixed = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="t" type="xs:NoSuchType"/>
            </xs:schema>"#;
        assert!(matches!(
            inferrer.infer(prefixed),
            Err(Error::UnresolvedTypeReference(_))
        ));

        let default_namespace = r#"
            <schema xmlns="http://www.w3.org/2001/XMLSchema">
              <element name="t" type="Missing"/>
            </schema>"#;
        assert!(matches!(
            inferrer.infer(default_namespace),
            Err(Error::UnresolvedTypeReference(_))
        ));

        let builtin = r#"
            <schema xmlns="http://www.w3.org/2001/XMLSchema">
              <element name="t" type="dateTime"/>
            </schema>"#;
        assert!(inferrer.infer(builtin).is_ok());
    }

    #[test]
    fn test_attribute_ref_keeps_prefix() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="note">
                <xs:complexType>
                  <xs:attribute ref="xml:lang"/>
                </xs:complexType>
              </xs:element>
            </xs:schema>"#;
        assert_eq!(
            infer(xsd),
            json!([{"name": "note", "type": "object", "properties": [
                {"name": "@xml:lang", "type": "string"}
            ]}])
        );
    }

    #[test]
    fn test_recursive_type_is_cut() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="node" type="NodeType"/>
              <xs:complexType name="NodeType">
                <xs:sequence>
                  <xs:element name="label" type="xs:string"/>
                  <xs:element name="child" type="NodeType" minOccurs="0" maxOccurs="unbounded"/>
                </xs:sequence>
              </xs:complexType>
            </xs:schema>"#;
        assert_eq!(
            infer(xsd),
            json!([{
                "name": "node",
                "type": "object",
                "properties": [
                    {"name": "label", "type": "string"},
                    {"name": "child", "type": "array", "of": "object", "properties": []}
                ]
            }])
        );
    }

    #[test]
    fn test_element_ref_and_choice() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="doc">
                <xs:complexType>
                  <xs:choice>
                    <xs:element ref="para" maxOccurs="unbounded"/>
                    <xs:element name="title" type="xs:string"/>
                  </xs:choice>
                </xs:complexType>
              </xs:element>
              <xs:element name="para">
                <xs:complexType>
                  <xs:attribute name="lang"/>
                </xs:complexType>
              </xs:element>
            </xs:schema>"#;
        assert_eq!(
            infer(xsd),
            json!([{
                "name": "doc",
                "type": "object",
                "properties": [
                    {
                        "name": "para",
                        "type": "array",
                        "of": "object",
                        "properties": [{"name": "@lang", "type": "string"}]
                    },
                    {"name": "title", "type": "string"}
                ]
            }])
        );
    }

    #[test]
    fn test_no_element_declaration() {
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#;
        let schema = XsdSchemaInferrer::new().infer_schema(xsd).unwrap();
        assert!(schema.fields.is_empty());
        assert_eq!(schema.root_name, None);
    }

    #[test]
    fn test_root_name() {
        let xsd = r#"
            <schema xmlns="http://www.w3.org/2001/XMLSchema">
              <element name="catalog" type="string"/>
            </schema>"#;
        let schema = XsdSchemaInferrer::new().infer_schema(xsd).unwrap();
        assert_eq!(schema.root_name.as_deref(), Some("catalog"));
    }

    #[test]
    fn test_type_depth_limit() {
        let xsd = r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="a" type="A"/>
              <xs:complexType name="A"><xs:sequence><xs:element name="b" type="B"/></xs:sequence></xs:complexType>
              <xs:complexType name="B"><xs:sequence><xs:element name="c" type="C"/></xs:sequence></xs:complexType>
              <xs:complexType name="C"><xs:sequence><xs:element name="d" type="xs:string"/></xs:sequence></xs:complexType>
            </xs:schema>"#;
        let limits = Limits {
            max_type_depth: 2,
            ..Limits::default()
        };
        let result = XsdSchemaInferrer::new().with_limits(limits).infer(xsd);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }
}
