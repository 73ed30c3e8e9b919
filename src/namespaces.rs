//! XML namespace handling
//!
//! This module provides utilities for working with XML namespaces,
//! qualified names (QNames), and namespace prefix mappings.

use crate::error::{Error, Result};
use crate::names::split_qname;
use std::collections::HashMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
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

    /// Check whether this name is `local` in namespace `namespace`
    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local_name == local && self.namespace.as_deref() == namespace
    }
}

/// Formats as `{namespace}localName`, or just the local name without a namespace
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Format a local name qualified by an optional namespace
pub fn qualified_name(namespace: Option<&str>, local_name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{{{}}}{}", ns, local_name),
        _ => local_name.to_string(),
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
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

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace; an empty URI undeclares it
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
        match prefix {
            "xml" => Some(crate::XML_NAMESPACE),
            _ => self.prefixes.get(prefix).map(|s| s.as_str()),
        }
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Iterate over the declared prefixes
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Find a prefix bound to `namespace`
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, ns)| ns.as_str() == namespace)
            .map(|(p, _)| p.as_str())
    }

    /// Layer `child` declarations over this context
    pub fn extended(&self, child: &NamespaceContext) -> NamespaceContext {
        let mut merged = self.clone();
        for (prefix, ns) in &child.prefixes {
            merged.prefixes.insert(prefix.clone(), ns.clone());
        }
        if child.default_namespace.is_some() {
            merged.default_namespace = child.default_namespace.clone();
        }
        merged
    }

    /// Resolve a prefixed name to a QName
    ///
    /// Unprefixed names take the default namespace, as QName-valued
    /// attributes do in schema documents.
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        match split_qname(prefixed_name) {
            (Some(prefix), local) => {
                let namespace = self
                    .get_namespace(prefix)
                    .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
                Ok(QName::namespaced(namespace, local))
            }
            (None, local) => Ok(QName::new(self.default_namespace.clone(), local)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_creation() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.namespace, Some("http://example.com".to_string()));
        assert_eq!(qname.local_name, "element");
        assert!(qname.matches(Some("http://example.com"), "element"));
    }

    #[test]
    fn test_qname_display() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.to_string(), "{http://example.com}element");

        let qname_local = QName::local("element");
        assert_eq!(qname_local.to_string(), "element");
        assert_eq!(qualified_name(Some(""), "element"), "element");
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", "http://www.w3.org/2001/XMLSchema");
        ctx.set_default_namespace("http://example.com");

        assert_eq!(
            ctx.get_namespace("xs"),
            Some("http://www.w3.org/2001/XMLSchema")
        );
        assert_eq!(ctx.get_default_namespace(), Some("http://example.com"));
        assert_eq!(ctx.prefix_for("http://www.w3.org/2001/XMLSchema"), Some("xs"));
    }

    #[test]
    fn test_extended_context_overrides() {
        let mut parent = NamespaceContext::new();
        parent.add_prefix("a", "urn:a");
        parent.set_default_namespace("urn:default");

        let mut child = NamespaceContext::new();
        child.add_prefix("a", "urn:other");
        child.add_prefix("b", "urn:b");

        let merged = parent.extended(&child);
        assert_eq!(merged.get_namespace("a"), Some("urn:other"));
        assert_eq!(merged.get_namespace("b"), Some("urn:b"));
        assert_eq!(merged.get_default_namespace(), Some("urn:default"));
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", "http://www.w3.org/2001/XMLSchema");

        let qname = ctx.resolve("xs:element").unwrap();
        assert_eq!(
            qname.namespace,
            Some("http://www.w3.org/2001/XMLSchema".to_string())
        );
        assert_eq!(qname.local_name, "element");
        assert!(matches!(ctx.resolve("nope:element"), Err(Error::Namespace(_))));
        assert_eq!(ctx.resolve("plain").unwrap(), QName::local("plain"));
    }
}
