//! Error types for xmlmapper
//!
//! This module defines all error types used throughout the library.
//! Every failure is surfaced directly to the caller: mapping and inference
//! are pure transforms, so retrying the same input never changes the outcome.

use std::fmt;
use thiserror::Error;

/// Result type alias using xmlmapper Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xmlmapper operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or blank required input, or a document without a root element
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed XML or XSD text
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A value that cannot be mapped to XML (e.g. a non-scalar attribute)
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A `type` reference naming a type that the schema does not define
    #[error("unresolved type reference: {0}")]
    UnresolvedTypeReference(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// XML parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Byte position in the input where parsing stopped
    pub position: Option<usize>,
    /// Human readable location (e.g. the element being parsed)
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            location: None,
        }
    }

    /// Set the byte position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(pos) = self.position {
            write!(f, " (at byte {})", pos)?;
        }

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
