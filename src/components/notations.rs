//! Notation declarations

use crate::documents::Element;
use crate::error::Result;

use super::annotations::Annotation;
use super::base::Component;

/// Notation declaration component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationDeclaration {
    /// Notation name
    pub name: String,
    /// Target namespace
    pub namespace: Option<String>,
    /// Public identifier
    pub public: Option<String>,
    /// System identifier
    pub system: Option<String>,
    /// Annotation
    pub annotation: Option<Annotation>,
}

impl NotationDeclaration {
    /// Build from a top-level `notation` element
    pub fn from_element(node: &Element, namespace: Option<&str>) -> Result<Self> {
        let name = node
            .get_attribute("name")
            .ok_or_else(|| node.structure_error("notation requires a name"))?;
        let public = node.get_attribute("public").map(String::from);
        let system = node.get_attribute("system").map(String::from);
        if public.is_none() && system.is_none() {
            return Err(node.structure_error("notation requires a public or system identifier"));
        }
        Ok(Self {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            public,
            system,
            annotation: Annotation::of(node),
        })
    }
}

impl Component for NotationDeclaration {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn kind(&self) -> &'static str {
        "notation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    #[test]
    fn test_notation() {
        let doc = Document::from_string(r#"<notation name="gif" public="image/gif" system="viewer.exe"/>"#).unwrap();
        let notation = NotationDeclaration::from_element(doc.root().unwrap(), Some("urn:t")).unwrap();
        assert_eq!(notation.public.as_deref(), Some("image/gif"));
        assert_eq!(notation.system.as_deref(), Some("viewer.exe"));
        assert_eq!(notation.qualified_name().as_deref(), Some("{urn:t}gif"));
    }

    #[test]
    fn test_notation_needs_identifier() {
        let doc = Document::from_string(r#"<notation name="png"/>"#).unwrap();
        assert!(NotationDeclaration::from_element(doc.root().unwrap(), None)
            .unwrap_err()
            .is_structural());
    }
}
