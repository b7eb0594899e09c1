//! XML namespace handling
//!
//! This module provides qualified names (QNames) and scoped prefix mappings.
//! Only enough namespace awareness is kept to recognise XSD declarations
//! independently of the prefix a schema author picked.

use crate::error::{Error, Result};
use crate::names::split_qname;
use std::collections::HashMap;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Check whether this name is `local_name` in one of `namespaces`
    pub fn matches(&self, namespaces: &[&str], local_name: &str) -> bool {
        self.local_name == local_name
            && self
                .namespace
                .as_deref()
                .map(|ns| namespaces.contains(&ns))
                .unwrap_or(false)
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
///
/// A context is created per element from its parent's context, so inner
/// declarations shadow outer ones.
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a nested scope inheriting every mapping of `self`
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace (an empty URI undeclares it)
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        self.default_namespace = if namespace.is_empty() {
            None
        } else {
            Some(namespace)
        };
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Resolve a prefixed element name to a QName
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        match split_qname(prefixed_name) {
            (Some("xml"), local) => Ok(QName::namespaced(crate::XML_NAMESPACE, local)),
            (Some(prefix), local) => {
                let namespace = self
                    .get_namespace(prefix)
                    .ok_or_else(|| Error::Name(format!("Unknown prefix: {}", prefix)))?;
                Ok(QName::namespaced(namespace, local))
            }
            (None, local) => Ok(QName::new(self.default_namespace.clone(), local)),
        }
    }
}
