//! Complex type definitions
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#Complex_Type_Definitions

use crate::documents::Element;
use std::fmt;

use super::annotations::Annotation;
use super::attributes::AttributeUses;
use super::base::{Component, DerivationMethod, DerivationSet, TypeId, UR_TYPE_ID};
use super::groups::{Compositor, ModelGroup};
use super::particles::{Occurs, Particle, Term};
use super::wildcards::Wildcard;

/// Content type of a complex type
#[derive(Debug, Clone, PartialEq)]
pub enum ContentType {
    /// No character or element content
    Empty,
    /// Character content typed by a simple type
    Simple(TypeId),
    /// Element content only
    ElementOnly(Particle),
    /// Character data interleaved with element content
    Mixed(Particle),
}

impl ContentType {
    /// Content type keyword
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Empty => "empty",
            ContentType::Simple(_) => "simple",
            ContentType::ElementOnly(_) => "element-only",
            ContentType::Mixed(_) => "mixed",
        }
    }

    /// Content particle of element-only and mixed content
    pub fn particle(&self) -> Option<&Particle> {
        match self {
            ContentType::ElementOnly(p) | ContentType::Mixed(p) => Some(p),
            _ => None,
        }
    }

    /// Simple type of simple content
    pub fn simple_type(&self) -> Option<TypeId> {
        match self {
            ContentType::Simple(id) => Some(*id),
            _ => None,
        }
    }

    /// Check for mixed content
    pub fn is_mixed(&self) -> bool {
        matches!(self, ContentType::Mixed(_))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complex type definition component
#[derive(Debug, Clone)]
pub struct ComplexTypeDefinition {
    /// Local name, `None` when anonymous
    pub name: Option<String>,
    /// Target namespace
    pub namespace: Option<String>,
    /// Base type; set once resolution knows it
    pub base_type: Option<TypeId>,
    /// Derivation method; `None` while unresolved
    pub derivation: Option<DerivationMethod>,
    /// `abstract="true"`
    pub is_abstract: bool,
    /// Derivations disallowed by `final`
    pub final_set: DerivationSet,
    /// Substitutions disallowed by `block`
    pub prohibited_substitutions: DerivationSet,
    /// Attribute uses
    pub attribute_uses: AttributeUses,
    /// Attribute wildcard
    pub attribute_wildcard: Option<Wildcard>,
    /// Content type; set together with the derivation method
    pub content_type: Option<ContentType>,
    /// Annotation of the defining element
    pub annotation: Option<Annotation>,
    /// Schema element still to be resolved
    pub(crate) node: Option<Element>,
    /// Anonymous simple content type built while resolving, reused on retries
    pub(crate) anonymous_dependency: Option<TypeId>,
    builtin: bool,
}

impl ComplexTypeDefinition {
    /// Create an unresolved definition bound to its schema element
    pub fn unresolved(name: Option<&str>, namespace: Option<&str>, node: Element) -> Self {
        Self {
            name: name.map(String::from),
            namespace: namespace.map(String::from),
            base_type: None,
            derivation: None,
            is_abstract: false,
            final_set: DerivationSet::default(),
            prohibited_substitutions: DerivationSet::default(),
            attribute_uses: AttributeUses::new(),
            attribute_wildcard: None,
            content_type: None,
            annotation: Annotation::of(&node),
            node: Some(node),
            anonymous_dependency: None,
            builtin: false,
        }
    }

    /// The complex ur-type (`anyType`), resolved at construction
    ///
    /// It restricts itself, admits any attribute laxly, and has mixed
    /// content of any elements, laxly, any number of times.
    pub(crate) fn ur_type(namespace: &str) -> Self {
        let wildcard_particle = Particle::with_occurs(
            Term::Wildcard(Wildcard::any_lax()),
            Occurs::zero_or_more(),
        );
        let content = Particle::with_occurs(
            Term::ModelGroup(ModelGroup::new(Compositor::Sequence, vec![wildcard_particle])),
            Occurs::once(),
        );
        Self {
            name: Some("anyType".to_string()),
            namespace: Some(namespace.to_string()),
            base_type: Some(UR_TYPE_ID),
            derivation: Some(DerivationMethod::Restriction),
            is_abstract: false,
            final_set: DerivationSet::default(),
            prohibited_substitutions: DerivationSet::default(),
            attribute_uses: AttributeUses::new(),
            attribute_wildcard: Some(Wildcard::any_lax()),
            content_type: Some(ContentType::Mixed(content)),
            annotation: None,
            node: None,
            anonymous_dependency: None,
            builtin: true,
        }
    }

    /// Whether the definition is part of the built-in hierarchy
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Take over the schema element of a same-named schema definition
    pub(crate) fn absorb(&mut self, other: ComplexTypeDefinition) {
        self.node = other.node;
        self.annotation = other.annotation;
        self.final_set = other.final_set;
        self.prohibited_substitutions = other.prohibited_substitutions;
        self.derivation = None;
        self.content_type = None;
        self.anonymous_dependency = None;
    }
}

impl Component for ComplexTypeDefinition {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn is_resolved(&self) -> bool {
        self.derivation.is_some()
    }

    fn kind(&self) -> &'static str {
        "complexType"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::wildcards::{NamespaceConstraint, ProcessContents};

    #[test]
    fn test_ur_type_shape() {
        let ur = ComplexTypeDefinition::ur_type("http://www.w3.org/2001/XMLSchema");
        assert_eq!(ur.base_type, Some(UR_TYPE_ID));
        assert_eq!(ur.derivation, Some(DerivationMethod::Restriction));
        assert!(ur.attribute_uses.is_empty());
        assert!(ur.is_resolved() && ur.is_builtin());

        let wildcard = ur.attribute_wildcard.as_ref().unwrap();
        assert_eq!(wildcard.namespace_constraint, NamespaceConstraint::Any);
        assert_eq!(wildcard.process_contents, ProcessContents::Lax);

        let content = ur.content_type.as_ref().unwrap();
        assert!(content.is_mixed());
        let group = content.particle().unwrap().model_group().unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.particles[0].max_occurs(), None);
        assert!(matches!(group.particles[0].term, Term::Wildcard(_)));
    }

    #[test]
    fn test_content_type_accessors() {
        assert_eq!(ContentType::Empty.label(), "empty");
        assert_eq!(ContentType::Simple(TypeId(3)).simple_type(), Some(TypeId(3)));
        assert!(ContentType::Empty.particle().is_none());
    }
}
