//! Attribute declarations, attribute uses and attribute groups
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#cAttribute_Declarations

use crate::namespaces::QName;
use indexmap::IndexMap;

use super::annotations::Annotation;
use super::base::{AttributeDeclId, Component, Scope, TypeId, ValueConstraint, SIMPLE_UR_TYPE_ID};
use super::wildcards::Wildcard;

/// Attribute uses keyed by the declared attribute's qualified name
pub type AttributeUses = IndexMap<QName, AttributeUse>;

/// Attribute declaration component
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDeclaration {
    /// Attribute name
    pub name: String,
    /// Namespace of the attribute name
    pub namespace: Option<String>,
    /// Simple type of the attribute value
    pub type_definition: TypeId,
    /// Global or local
    pub scope: Scope,
    /// Default or fixed value
    pub value_constraint: Option<ValueConstraint>,
    /// Annotation
    pub annotation: Option<Annotation>,
}

impl AttributeDeclaration {
    /// Create a declaration typed by the simple ur-type
    pub fn new(name: &str, namespace: Option<&str>, scope: Scope) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            type_definition: SIMPLE_UR_TYPE_ID,
            scope,
            value_constraint: None,
            annotation: None,
        }
    }

    /// Qualified name used as the attribute-use key
    pub fn qname(&self) -> QName {
        QName::new(self.namespace.clone(), self.name.clone())
    }
}

impl Component for AttributeDeclaration {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn kind(&self) -> &'static str {
        "attribute"
    }
}

/// Attribute use: a declaration plus how a complex type uses it
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeUse {
    /// `use="required"`
    pub required: bool,
    /// The declaration in use
    pub declaration: AttributeDeclId,
    /// Default or fixed value of the use
    pub value_constraint: Option<ValueConstraint>,
}

/// Named, top-level attribute group (`attributeGroup name="..."`)
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeGroupDefinition {
    /// Group name
    pub name: String,
    /// Target namespace
    pub namespace: Option<String>,
    /// Attribute uses of the group, including nested group references
    pub attribute_uses: AttributeUses,
    /// Attribute wildcard of the group
    pub attribute_wildcard: Option<Wildcard>,
    /// Annotation
    pub annotation: Option<Annotation>,
}

impl AttributeGroupDefinition {
    pub(crate) fn placeholder(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            attribute_uses: AttributeUses::new(),
            attribute_wildcard: None,
            annotation: None,
        }
    }
}

impl Component for AttributeGroupDefinition {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn kind(&self) -> &'static str {
        "attributeGroup"
    }
}
