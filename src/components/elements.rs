//! Element declarations
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#cElement_Declarations

use crate::namespaces::QName;

use super::annotations::Annotation;
use super::base::{
    Component, DerivationSet, ElementDeclId, IdentityConstraintId, Scope, TypeId,
    ValueConstraint, UR_TYPE_ID,
};

/// Element declaration component
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDeclaration {
    /// Element name
    pub name: String,
    /// Namespace of the element name
    pub namespace: Option<String>,
    /// Type definition of the element
    pub type_definition: TypeId,
    /// Global or local
    pub scope: Scope,
    /// Default or fixed value
    pub value_constraint: Option<ValueConstraint>,
    /// `nillable="true"`
    pub nillable: bool,
    /// `abstract="true"`
    pub is_abstract: bool,
    /// Head of the substitution group this element belongs to
    pub substitution_group: Option<ElementDeclId>,
    /// Derivations excluded from the substitution group (`final`)
    pub substitution_group_exclusions: DerivationSet,
    /// Disallowed substitutions (`block`)
    pub disallowed_substitutions: DerivationSet,
    /// Identity constraints declared on the element
    pub identity_constraints: Vec<IdentityConstraintId>,
    /// Annotation
    pub annotation: Option<Annotation>,
    /// Unresolved `substitutionGroup` reference
    pub(crate) substitution_group_name: Option<QName>,
    /// Type was not given and defaults to the substitution group head's
    pub(crate) type_from_head: bool,
}

impl ElementDeclaration {
    /// Create a declaration typed by the ur-type
    pub fn new(name: &str, namespace: Option<&str>, scope: Scope) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            type_definition: UR_TYPE_ID,
            scope,
            value_constraint: None,
            nillable: false,
            is_abstract: false,
            substitution_group: None,
            substitution_group_exclusions: DerivationSet::default(),
            disallowed_substitutions: DerivationSet::default(),
            identity_constraints: Vec::new(),
            annotation: None,
            substitution_group_name: None,
            type_from_head: false,
        }
    }

    /// Qualified name of the element
    pub fn qname(&self) -> QName {
        QName::new(self.namespace.clone(), self.name.clone())
    }
}

impl Component for ElementDeclaration {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn is_resolved(&self) -> bool {
        self.substitution_group_name.is_none() || self.substitution_group.is_some()
    }

    fn kind(&self) -> &'static str {
        "element"
    }
}
