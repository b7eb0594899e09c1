//! XML name validation and utilities
//!
//! Element and attribute names written by the serializer come from caller
//! supplied keys, so they are checked against the XML Name production before
//! anything is emitted.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// Simplified NameStartChar / NameChar ranges from XML 1.0 (5th edition)
static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[:A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}][:A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\-\.0-9\u{B7}\u{300}-\u{36F}\u{203F}-\u{2040}]*$",
    )
    .unwrap()
});

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Validate an XML Name and return an error if invalid
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid XML Name: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Strip the namespace prefix from a prefixed name (`tns:PersonType` -> `PersonType`)
pub fn local_name(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}
