//! Error types for xmlschema-structures
//!
//! This module defines all error types used throughout the library.
//! Structural problems in the schema document, unresolvable references,
//! and legal-but-unsupported constructs are kept apart so callers can tell
//! "the document is wrong" from "this engine does not cover that yet".
//!
//! Programmatic misuse of the built-in singletons is not represented here:
//! it panics.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for component model operations
#[derive(Error, Debug)]
pub enum Error {
    /// The schema document violates the expected shape
    #[error("schema structure error: {0}")]
    Structure(#[from] ParseError),

    /// The resolution fixpoint made no progress; names the stuck components
    #[error("unable to resolve type definitions: {}", .0.join(" "))]
    Unresolvable(Vec<String>),

    /// A recognized construct this engine does not support
    #[error("not implemented: {0}")]
    Unimplemented(String),

    /// Value error (lexical form not valid for a datatype)
    #[error("value error: {0}")]
    Value(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Shorthand for a structural error with just a message
    pub fn structure(message: impl Into<String>) -> Self {
        Error::Structure(ParseError::new(message))
    }

    /// Check if this is a structural error
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structure(_))
    }
}

/// Schema document structure error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the schema document
    pub location: Option<String>,
    /// Schema source that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Multiple list elements nested in simpleType")
            .with_location("schema/simpleType[@name='Grades']")
            .with_source("<xs:list itemType='Grade'/>");

        let msg = format!("{}", err);
        assert!(msg.contains("Multiple list elements"));
        assert!(msg.contains("Location:"));
        assert!(msg.contains("Source:"));
    }

    #[test]
    fn test_unresolvable_lists_names() {
        let err = Error::Unresolvable(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(err.to_string(), "unable to resolve type definitions: A B");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::new("test").into();
        assert!(err.is_structural());
        assert!(!Error::Unimplemented("union".into()).is_structural());
    }
}
