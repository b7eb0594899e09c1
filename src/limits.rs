//! Limits and constraints for XML processing
//!
//! Recursion in the parser, the serializer and both inferrers is bounded by
//! input nesting, so deeply nested documents and runaway type-reference
//! chains are the only resource risk. These limits cap both.

use crate::error::{Error, Result};

/// Resource limits applied while parsing and inferring
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum XML text size in bytes
    pub max_xml_size: usize,

    /// Maximum depth of nested XSD type resolutions
    pub max_type_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_type_depth: 100,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_type_depth: 20,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10000,
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_type_depth: 1000,
        }
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if type resolution depth is within limits
    pub fn check_type_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_type_depth {
            Err(Error::LimitExceeded(format!(
                "Type resolution depth {} exceeds maximum {}",
                depth, self.max_type_depth
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_xml_depth, 1000);
        assert!(limits.check_xml_depth(500).is_ok());
        assert!(limits.check_xml_depth(1500).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_xml_depth < Limits::default().max_xml_depth);
        assert!(limits.check_type_depth(21).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_xml_depth > Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(5000).is_ok());
    }

    #[test]
    fn test_check_xml_size() {
        let limits = Limits::default();
        assert!(limits.check_xml_size(1024).is_ok());
        assert!(matches!(
            limits.check_xml_size(200 * 1024 * 1024),
            Err(Error::LimitExceeded(_))
        ));
    }
}
