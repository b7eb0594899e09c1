//! XML document handling
//!
//! This module is the narrow XML interface the rest of the crate consumes:
//! parse text into an element tree, read names, attributes and children, and
//! look elements up in document order.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, QName};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element name as written in the source (prefix included)
    pub name: String,
    /// Element attributes in document order, keyed by name as written.
    /// Namespace declarations are not attributes.
    pub attributes: IndexMap<String, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace context in scope for this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Get the element name as written in the source
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an attribute value by its name as written
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append text content
    pub fn push_text(&mut self, text: &str) {
        match self.text.as_mut() {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Direct element children in document order
    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }

    /// Check whether the element has element children
    pub fn has_element_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Iterate over this element and all of its descendants in document order
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Iterate over the descendants of this element in document order
    pub fn descendants(&self) -> impl Iterator<Item = &Element> {
        self.iter().skip(1)
    }
}

/// Preorder iterator over an element subtree
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse an XML document from a string
    pub fn parse(xml: &str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                ParseError::new(format!("Error parsing XML: {}", e))
                    .with_position(reader.buffer_position())
            })?;

            match event {
                Event::Start(e) => {
                    let element = Self::parse_element(&e, element_stack.last())?;
                    element_stack.push(element);
                    limits.check_xml_depth(element_stack.len())?;
                }
                Event::End(_) => {
                    let current = element_stack.pop().ok_or_else(|| {
                        ParseError::new("Unexpected closing tag")
                            .with_position(reader.buffer_position())
                    })?;
                    Self::attach(&mut doc, &mut element_stack, current)?;
                }
                Event::Empty(e) => {
                    let element = Self::parse_element(&e, element_stack.last())?;
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    Self::attach(&mut doc, &mut element_stack, element)?;
                }
                Event::Text(e) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e.unescape().map_err(|e| {
                            ParseError::new(format!("Failed to unescape text: {}", e))
                                .with_position(reader.buffer_position())
                        })?;
                        if !text.trim().is_empty() {
                            current.push_text(&text);
                        }
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = std::str::from_utf8(&e).map_err(|e| {
                            ParseError::new(format!("Invalid CDATA section: {}", e))
                        })?;
                        current.push_text(text);
                    }
                }
                Event::Eof => break,
                _ => {} // Comments, processing instructions, declarations, doctypes
            }
        }

        if let Some(unclosed) = element_stack.last() {
            return Err(ParseError::new(format!("Unclosed element <{}>", unclosed.name))
                .with_position(reader.buffer_position())
                .into());
        }

        Ok(doc)
    }

    /// Hand a finished element to its parent, or make it the document root
    fn attach(doc: &mut Document, stack: &mut [Element], element: Element) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.add_child(element);
            Ok(())
        } else if doc.root.is_some() {
            Err(ParseError::new("Multiple root elements")
                .with_location(format!("<{}>", element.name))
                .into())
        } else {
            doc.root = Some(element);
            Ok(())
        }
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart, parent: Option<&Element>) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| ParseError::new(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut namespaces = parent
            .map(|p| p.namespaces.child())
            .unwrap_or_default();
        let mut attributes = IndexMap::new();

        for attr_result in start.attributes() {
            let attr = attr_result.map_err(|e| {
                ParseError::new(format!("Failed to parse attribute: {}", e))
                    .with_location(format!("<{}>", name))
            })?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::new(format!("Invalid attribute name: {}", e)))?;

            let attr_value = attr
                .unescape_value()
                .map_err(|e| {
                    ParseError::new(format!("Failed to unescape attribute value: {}", e))
                        .with_location(format!("<{} {}>", name, attr_name))
                })?
                .to_string();

            if attr_name == "xmlns" {
                namespaces.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                namespaces.add_prefix(prefix, attr_value);
            } else {
                attributes.insert(attr_name.to_string(), attr_value);
            }
        }

        // Undeclared prefixes are tolerated: the element simply has no namespace.
        let qname = namespaces.resolve(&name).unwrap_or_else(|_| {
            QName::local(crate::names::local_name(&name))
        });

        Ok(Element {
            qname,
            name,
            attributes,
            text: None,
            children: Vec::new(),
            namespaces,
        })
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Get the root element, failing with `InvalidInput` when there is none
    pub fn require_root(&self, what: &str) -> Result<&Element> {
        self.root
            .as_ref()
            .ok_or_else(|| Error::InvalidInput(format!("Invalid {} input", what)))
    }

    /// Find the first element (document element included) matching `predicate`
    pub fn find_first<P>(&self, mut predicate: P) -> Option<&Element>
    where
        P: FnMut(&Element) -> bool,
    {
        self.root.as_ref()?.iter().find(|e| predicate(e))
    }
}
