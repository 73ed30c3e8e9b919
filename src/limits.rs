//! Limits for schema processing
//!
//! These bound the work a single schema session may do: how deep the
//! markup may nest, how many type definitions the arena may hold, and how
//! many passes the resolution fixpoint may take.

use crate::error::{Error, Result};

/// Processing limits for a schema session
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth accepted by the document parser
    pub max_xml_depth: usize,

    /// Maximum XML input size in bytes
    pub max_xml_size: usize,

    /// Maximum number of type definitions (built-ins included)
    pub max_type_definitions: usize,

    /// Maximum number of resolution passes
    pub max_resolution_passes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_type_definitions: 100_000,
            max_resolution_passes: 10_000,
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
            max_type_definitions: 10_000,
            max_resolution_passes: 1_000,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10_000,
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_type_definitions: 1_000_000,
            max_resolution_passes: 100_000,
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

    /// Check if the number of type definitions is within limits
    pub fn check_type_definitions(&self, count: usize) -> Result<()> {
        if count > self.max_type_definitions {
            Err(Error::LimitExceeded(format!(
                "Type definition count {} exceeds maximum {}",
                count, self.max_type_definitions
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
        assert!(limits.max_resolution_passes < Limits::default().max_resolution_passes);
        assert!(limits.check_xml_depth(150).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_xml_depth > Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(5000).is_ok());
    }

    #[test]
    fn test_check_type_definitions() {
        let limits = Limits::strict();
        assert!(limits.check_type_definitions(100).is_ok());
        assert!(matches!(
            limits.check_type_definitions(20_000),
            Err(Error::LimitExceeded(_))
        ));
    }
}
