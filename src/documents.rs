//! Schema document trees and queries
//!
//! A schema document is parsed into an owned element tree. Every element
//! knows its namespace-qualified name and the namespace declarations in
//! scope at that point, so QName-valued attributes (`base`, `type`,
//! `itemType`, `ref`) can be expanded later without the parser's help.
//!
//! The query methods on [`Element`] are what the component builders use to
//! pick apart definition nodes: find a unique named child, find the first
//! element child, read an attribute.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::names::split_qname;
use crate::namespaces::{NamespaceContext, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes
    pub attributes: HashMap<QName, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations in scope for this element
    pub namespaces: NamespaceContext,
    /// Steps from the document root down to this element
    pub path: String,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        let path = qname.local_name.clone();
        Self {
            qname,
            attributes: HashMap::new(),
            text: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
            path,
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Check whether this element is `{namespace}local`
    pub fn is(&self, namespace: Option<&str>, local: &str) -> bool {
        self.qname.matches(namespace, local)
    }

    /// Get an unqualified attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::local(name))
            .map(|s| s.as_str())
    }

    /// Get an attribute value by qualified name
    pub fn get_attribute_qname(&self, qname: &QName) -> Option<&str> {
        self.attributes.get(qname).map(|s| s.as_str())
    }

    /// Check for an unqualified attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append text content
    pub fn append_text(&mut self, text: &str) {
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// Find child elements by local name
    pub fn find_children(&self, local_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// Find the unique child named `{namespace}local`
    ///
    /// More than one such child is always an error; none is an error
    /// unless `absent_ok` is set.
    pub fn unique_child(
        &self,
        namespace: Option<&str>,
        local: &str,
        absent_ok: bool,
    ) -> Result<Option<&Element>> {
        let mut candidate = None;
        for child in self.children.iter().filter(|c| c.is(namespace, local)) {
            if candidate.is_some() {
                return Err(self.structure_error(format!(
                    "Multiple {} elements nested in {}",
                    local,
                    self.local_name()
                )));
            }
            candidate = Some(child);
        }
        if candidate.is_none() && !absent_ok {
            return Err(self.structure_error(format!(
                "Expected {} element nested in {}",
                local,
                self.local_name()
            )));
        }
        Ok(candidate)
    }

    /// Find the first element child
    ///
    /// With `require_unique`, a second element child is an error.
    pub fn first_child_element(&self, absent_ok: bool, require_unique: bool) -> Result<Option<&Element>> {
        let mut children = self.children.iter();
        let first = children.next();
        if require_unique && children.next().is_some() {
            return Err(self.structure_error(format!(
                "Multiple elements nested in {}",
                self.local_name()
            )));
        }
        if first.is_none() && !absent_ok {
            return Err(self.structure_error(format!(
                "No elements nested in {}",
                self.local_name()
            )));
        }
        Ok(first)
    }

    /// Expand a QName-valued attribute against the in-scope namespaces
    pub fn resolve_qname(&self, value: &str) -> Result<QName> {
        self.namespaces.resolve(value.trim())
    }

    /// This element's own path step, e.g. `simpleType[@name='Grade']`
    fn step(&self) -> String {
        match self.get_attribute("name") {
            Some(name) => format!("{}[@name='{}']", self.local_name(), name),
            None => self.local_name().to_string(),
        }
    }

    /// Error location of this element,
    /// e.g. `schema/simpleType[@name='Grade']/restriction`
    pub fn describe(&self) -> String {
        self.path.clone()
    }

    /// Build a structural error located at this element
    pub fn structure_error(&self, message: impl Into<String>) -> Error {
        Error::Structure(ParseError::new(message).with_location(self.describe()))
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

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Read and parse an XML document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes, enforcing `limits`
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, element_stack.last())?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, element_stack.last())?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        if !text.trim().is_empty() {
                            current.append_text(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        current.append_text(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Comments, processing instructions, doctype
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(Error::Xml("Unexpected end of document".to_string()));
        }

        Ok(doc)
    }

    /// Parse element from a start tag, resolving names against the parent's scope
    fn parse_element(start: &BytesStart, parent: Option<&Element>) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut declared = NamespaceContext::new();
        let mut raw_attributes = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                declared.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                declared.add_prefix(prefix, attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        let namespaces = match parent {
            Some(parent) => parent.namespaces.extended(&declared),
            None => declared,
        };

        let qname = match split_qname(&name) {
            (Some(prefix), local) => {
                let ns = namespaces.get_namespace(prefix).ok_or_else(|| {
                    Error::Namespace(format!("Unknown prefix '{}' on element {}", prefix, name))
                })?;
                QName::namespaced(ns, local)
            }
            (None, local) => QName::new(namespaces.get_default_namespace(), local),
        };

        let mut element = Element::new(qname);

        for (attr_name, attr_value) in raw_attributes {
            // Unprefixed attributes are in no namespace
            let attr_qname = match split_qname(&attr_name) {
                (Some(prefix), local) => {
                    let ns = namespaces.get_namespace(prefix).ok_or_else(|| {
                        Error::Namespace(format!(
                            "Unknown prefix '{}' on attribute {}",
                            prefix, attr_name
                        ))
                    })?;
                    QName::namespaced(ns, local)
                }
                (None, local) => QName::local(local),
            };
            element.attributes.insert(attr_qname, attr_value);
        }

        element.namespaces = namespaces;
        element.path = match parent {
            Some(parent) => format!("{}/{}", parent.path, element.step()),
            None => element.step(),
        };
        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XS: &str = "http://www.w3.org/2001/XMLSchema";

    #[test]
    fn test_parse_simple_xml() {
        let xml = r#"<root><child>text</child></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].local_name(), "child");
        assert_eq!(root.children[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn test_parse_with_attributes() {
        let xml = r#"<root attr1="value1" attr2="value2"><child/></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.get_attribute("attr1"), Some("value1"));
        assert_eq!(root.get_attribute("attr2"), Some("value2"));
        assert!(!root.has_attribute("attr3"));
    }

    #[test]
    fn test_element_namespaces_resolved() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:simpleType name="a"><xs:list itemType="xs:int"/></xs:simpleType>
        </xs:schema>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root().unwrap();
        assert!(root.is(Some(XS), "schema"));
        let st = &root.children[0];
        assert!(st.is(Some(XS), "simpleType"));
        let list = st.unique_child(Some(XS), "list", false).unwrap().unwrap();
        let item = list.resolve_qname(list.get_attribute("itemType").unwrap()).unwrap();
        assert!(item.matches(Some(XS), "int"));
    }

    #[test]
    fn test_default_namespace_inherited() {
        let xml = r#"<root xmlns="http://example.com"><child/></root>"#;
        let doc = Document::from_string(xml).unwrap();
        let root = doc.root.unwrap();
        assert_eq!(root.namespace(), Some("http://example.com"));
        assert_eq!(root.children[0].namespace(), Some("http://example.com"));
    }

    #[test]
    fn test_unknown_prefix_fails() {
        assert!(matches!(
            Document::from_string("<a:root/>"),
            Err(Error::Namespace(_))
        ));
    }

    #[test]
    fn test_unique_child() {
        let xml = r#"<root><a/><b/><a/></root>"#;
        let doc = Document::from_string(xml).unwrap();
        let root = doc.root.unwrap();

        assert!(root.unique_child(None, "b", false).unwrap().is_some());
        assert!(root.unique_child(None, "c", true).unwrap().is_none());
        assert!(root.unique_child(None, "c", false).unwrap_err().is_structural());
        assert!(root.unique_child(None, "a", true).unwrap_err().is_structural());
    }

    #[test]
    fn test_first_child_element() {
        let doc = Document::from_string("<root><a/><b/></root>").unwrap();
        let root = doc.root.unwrap();
        assert_eq!(
            root.first_child_element(false, false).unwrap().unwrap().local_name(),
            "a"
        );
        assert!(root.first_child_element(false, true).is_err());

        let empty = Element::new(QName::local("empty"));
        assert!(empty.first_child_element(true, false).unwrap().is_none());
        assert!(empty.first_child_element(false, false).is_err());
    }

    #[test]
    fn test_error_location_is_path_from_root() {
        let xml = format!(
            r#"<xs:schema xmlns:xs="{}"><xs:simpleType name="Grade"><xs:restriction base="xs:string"/></xs:simpleType></xs:schema>"#,
            XS
        );
        let doc = Document::from_string(&xml).unwrap();
        let root = doc.root.unwrap();
        let restriction = &root.children[0].children[0];
        assert_eq!(
            restriction.describe(),
            "schema/simpleType[@name='Grade']/restriction"
        );
        assert_eq!(root.describe(), "schema");

        let err = restriction.structure_error("bad facet");
        match err {
            Error::Structure(parse) => assert_eq!(
                parse.location.as_deref(),
                Some("schema/simpleType[@name='Grade']/restriction")
            ),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let limits = Limits {
            max_xml_depth: 2,
            ..Limits::default()
        };
        let result = Document::parse_with_limits(b"<a><b><c/></b></a>", &limits);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<root><child1/><child2/><child1/></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root.unwrap();
        let children = root.find_children("child1");
        assert_eq!(children.len(), 2);
    }
}
