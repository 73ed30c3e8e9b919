//! Identity-constraint definitions
//!
//! Selector and field XPath expressions are kept as written; they are
//! never evaluated.

use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::QName;
use crate::XSD_NAMESPACE;
use std::fmt;

use super::annotations::Annotation;
use super::base::{Component, IdentityConstraintId};

/// Identity-constraint category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityConstraintCategory {
    /// `key`
    Key,
    /// `keyref`
    KeyRef,
    /// `unique`
    Unique,
}

impl IdentityConstraintCategory {
    /// Parse from element local name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "key" => Some(Self::Key),
            "keyref" => Some(Self::KeyRef),
            "unique" => Some(Self::Unique),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => f.write_str("key"),
            Self::KeyRef => f.write_str("keyref"),
            Self::Unique => f.write_str("unique"),
        }
    }
}

/// Identity-constraint definition component
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConstraintDefinition {
    /// Constraint name
    pub name: String,
    /// Target namespace
    pub namespace: Option<String>,
    /// key, keyref or unique
    pub category: IdentityConstraintCategory,
    /// Selector XPath
    pub selector: String,
    /// Field XPaths
    pub fields: Vec<String>,
    /// Key referenced by a keyref
    pub referenced_key: Option<IdentityConstraintId>,
    /// Annotation
    pub annotation: Option<Annotation>,
    /// Unresolved `refer` reference of a keyref
    pub(crate) refer: Option<QName>,
}

impl IdentityConstraintDefinition {
    /// Build from a `key`, `keyref` or `unique` element
    pub fn from_element(
        node: &Element,
        category: IdentityConstraintCategory,
        namespace: Option<&str>,
    ) -> Result<Self> {
        let name = node
            .get_attribute("name")
            .ok_or_else(|| node.structure_error(format!("{} requires a name", category)))?;
        let selector = node
            .unique_child(Some(XSD_NAMESPACE), "selector", false)?
            .and_then(|s| s.get_attribute("xpath"))
            .ok_or_else(|| node.structure_error("selector requires an xpath attribute"))?;

        let mut fields = Vec::new();
        for field in node
            .children
            .iter()
            .filter(|c| c.is(Some(XSD_NAMESPACE), "field"))
        {
            let xpath = field
                .get_attribute("xpath")
                .ok_or_else(|| field.structure_error("field requires an xpath attribute"))?;
            fields.push(xpath.to_string());
        }
        if fields.is_empty() {
            return Err(node.structure_error(format!("{} requires at least one field", category)));
        }

        let refer = match category {
            IdentityConstraintCategory::KeyRef => {
                let refer = node
                    .get_attribute("refer")
                    .ok_or_else(|| node.structure_error("keyref requires a refer attribute"))?;
                Some(node.resolve_qname(refer)?)
            }
            _ => None,
        };

        Ok(Self {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            category,
            selector: selector.to_string(),
            fields,
            referenced_key: None,
            annotation: Annotation::of(node),
            refer,
        })
    }
}

impl Component for IdentityConstraintDefinition {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn is_resolved(&self) -> bool {
        self.refer.is_none() || self.referenced_key.is_some()
    }

    fn kind(&self) -> &'static str {
        match self.category {
            IdentityConstraintCategory::Key => "key",
            IdentityConstraintCategory::KeyRef => "keyref",
            IdentityConstraintCategory::Unique => "unique",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    fn parse(xml: &str) -> Element {
        Document::from_string(xml).unwrap().root.unwrap()
    }

    #[test]
    fn test_key_definition() {
        let node = parse(
            r#"<xs:key xmlns:xs="http://www.w3.org/2001/XMLSchema" name="pk">
                <xs:selector xpath="item"/><xs:field xpath="@id"/><xs:field xpath="@rev"/>
            </xs:key>"#,
        );
        let key = IdentityConstraintDefinition::from_element(&node, IdentityConstraintCategory::Key, None).unwrap();
        assert_eq!(key.selector, "item");
        assert_eq!(key.fields, vec!["@id", "@rev"]);
        assert!(key.is_resolved());
        assert_eq!(key.kind(), "key");
    }

    #[test]
    fn test_keyref_requires_refer() {
        let node = parse(
            r#"<xs:keyref xmlns:xs="http://www.w3.org/2001/XMLSchema" name="fk">
                <xs:selector xpath="ref"/><xs:field xpath="@to"/>
            </xs:keyref>"#,
        );
        let err = IdentityConstraintDefinition::from_element(&node, IdentityConstraintCategory::KeyRef, None)
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_keyref_pending_until_linked() {
        let node = parse(
            r#"<xs:keyref xmlns:xs="http://www.w3.org/2001/XMLSchema" name="fk" refer="pk">
                <xs:selector xpath="ref"/><xs:field xpath="@to"/>
            </xs:keyref>"#,
        );
        let keyref = IdentityConstraintDefinition::from_element(&node, IdentityConstraintCategory::KeyRef, None)
            .unwrap();
        assert_eq!(keyref.refer, Some(QName::local("pk")));
        assert!(!keyref.is_resolved());
    }

    #[test]
    fn test_missing_selector() {
        let node = parse(
            r#"<xs:unique xmlns:xs="http://www.w3.org/2001/XMLSchema" name="u"><xs:field xpath="."/></xs:unique>"#,
        );
        assert!(IdentityConstraintDefinition::from_element(&node, IdentityConstraintCategory::Unique, None).is_err());
    }
}
