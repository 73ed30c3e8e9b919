//! Type definition resolution
//!
//! Construction leaves every type definition bound to the schema element
//! it came from. Resolution reads that element, looks up the definitions
//! it refers to and fills in base type, variety, content type and
//! attribute uses. When a referenced definition is not resolved yet, the
//! attempt reports [`Resolution::Deferred`] without changing anything and
//! [`Schema::resolve_all`] retries it on a later pass.
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#Complex_Type_Definition_details

use tracing::debug;

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::QName;
use crate::XSD_NAMESPACE;

use super::attributes::AttributeUses;
use super::base::{
    Component, DerivationMethod, DerivationSet, TypeDefinition, TypeId, SIMPLE_UR_TYPE_ID,
    UR_TYPE_ID,
};
use super::builtins::complex_ur_type;
use super::codecs::boolean_to_rust;
use super::complex_types::{ComplexTypeDefinition, ContentType};
use super::facets::Facets;
use super::groups::{Compositor, ModelGroup};
use super::particles::{Occurs, Particle, Term};
use super::schemas::{Resolution, Schema};
use super::simple_types::{SimpleTypeDefinition, Variety};
use super::wildcards::Wildcard;

/// Children of `restriction` that are not facets
const RESTRICTION_COMPONENTS: &[&str] = &["simpleType", "attribute", "attributeGroup", "anyAttribute"];

/// What a simple type resolves to
enum SimpleOutcome {
    Complete {
        base: TypeId,
        variety: Variety,
        facets: Facets,
    },
    Defer(TypeId),
}

/// What a complex type resolves to
enum ComplexOutcome {
    Complete(ComplexParts),
    Defer(TypeId),
}

struct ComplexParts {
    base: TypeId,
    derivation: DerivationMethod,
    content_type: ContentType,
    attribute_uses: AttributeUses,
    attribute_wildcard: Option<Wildcard>,
}

// =============================================================================
// Attribute helpers
// =============================================================================

/// Parse an optional boolean attribute
pub(crate) fn bool_attribute(node: &Element, name: &str) -> Result<bool> {
    match node.get_attribute(name) {
        Some(value) => boolean_to_rust(value.trim()).map_err(|_| {
            node.structure_error(format!("attribute {} must be a boolean, not '{}'", name, value))
        }),
        None => Ok(false),
    }
}

/// Parse an optional derivation set attribute such as `final` or `block`
pub(crate) fn derivation_attribute(
    node: &Element,
    name: &str,
    allowed: &[&str],
) -> Result<DerivationSet> {
    match node.get_attribute(name) {
        Some(value) => DerivationSet::parse(value, allowed).map_err(|token| {
            node.structure_error(format!("invalid {} value '{}'", name, token))
        }),
        None => Ok(DerivationSet::default()),
    }
}

impl Schema {
    // =========================================================================
    // References
    // =========================================================================

    /// Expand a QName reference and check it points into this schema
    ///
    /// Only the XSD namespace and the target namespace are reachable;
    /// other namespaces would need `import`.
    pub(crate) fn reference_name(&self, node: &Element, value: &str) -> Result<QName> {
        let qname = node.resolve_qname(value)?;
        let namespace = qname.namespace.as_deref();
        if namespace == self.target_namespace.as_deref()
            || namespace == Some(self.types.builtin_namespace())
        {
            Ok(qname)
        } else {
            Err(Error::Unimplemented(format!(
                "reference to {} from {}: imported namespaces are not supported",
                qname,
                node.describe()
            )))
        }
    }

    /// Look up the type definition a `type`/`base`/`itemType` value names
    pub(crate) fn type_reference(&self, node: &Element, value: &str) -> Result<TypeId> {
        let qname = self.reference_name(node, value)?;
        self.lookup(&qname.local_name)
            .ok_or_else(|| node.structure_error(format!("unknown type {}", value.trim())))
    }

    // =========================================================================
    // Anonymous definitions
    // =========================================================================

    /// Construct and queue an anonymous simple type from a nested `simpleType`
    pub(crate) fn anonymous_simple_type(&mut self, node: &Element) -> Result<TypeId> {
        if node.has_attribute("name") {
            return Err(node.structure_error("a local simpleType must not have a name"));
        }
        let namespace = self.target_namespace.clone();
        let st = SimpleTypeDefinition::unresolved(None, namespace.as_deref(), node.clone());
        let id = self.add_type(TypeDefinition::Simple(st))?;
        self.enqueue(id);
        Ok(id)
    }

    /// Construct and queue an anonymous complex type from a nested `complexType`
    pub(crate) fn anonymous_complex_type(&mut self, node: &Element) -> Result<TypeId> {
        if node.has_attribute("name") {
            return Err(node.structure_error("a local complexType must not have a name"));
        }
        let namespace = self.target_namespace.clone();
        let ct = ComplexTypeDefinition::unresolved(None, namespace.as_deref(), node.clone());
        let id = self.add_type(TypeDefinition::Complex(ct))?;
        self.enqueue(id);
        Ok(id)
    }

    fn anonymous_dependency(&self, owner: TypeId) -> Option<TypeId> {
        match self.types.get(owner) {
            Some(TypeDefinition::Simple(st)) => st.anonymous_dependency,
            Some(TypeDefinition::Complex(ct)) => ct.anonymous_dependency,
            None => None,
        }
    }

    fn set_anonymous_dependency(&mut self, owner: TypeId, dependency: TypeId) {
        match self.types.types.get_mut(owner.0) {
            Some(TypeDefinition::Simple(st)) => st.anonymous_dependency = Some(dependency),
            Some(TypeDefinition::Complex(ct)) => ct.anonymous_dependency = Some(dependency),
            None => {}
        }
    }

    /// The anonymous simple type `owner` depends on, built on first use
    ///
    /// Retries of a deferred resolution get the same definition back.
    fn dependent_simple_type(&mut self, owner: TypeId, node: &Element) -> Result<TypeId> {
        if let Some(dependency) = self.anonymous_dependency(owner) {
            return Ok(dependency);
        }
        let dependency = self.anonymous_simple_type(node)?;
        self.set_anonymous_dependency(owner, dependency);
        Ok(dependency)
    }

    // =========================================================================
    // Driver
    // =========================================================================

    /// Resolve one type definition
    ///
    /// Resolving an already resolved definition does nothing.
    pub fn resolve_type(&mut self, id: TypeId) -> Result<Resolution> {
        match self.types.get(id) {
            None => Err(Error::structure(format!(
                "no type definition with handle {}",
                id.index()
            ))),
            Some(definition) if definition.is_resolved() => Ok(Resolution::Resolved),
            Some(TypeDefinition::Simple(_)) => self.resolve_simple_type(id),
            Some(TypeDefinition::Complex(_)) => self.resolve_complex_type(id),
        }
    }

    fn take_node(&mut self, id: TypeId) -> Result<Element> {
        let node = match self.types.types.get_mut(id.0) {
            Some(TypeDefinition::Simple(st)) => st.node.take(),
            Some(TypeDefinition::Complex(ct)) => ct.node.take(),
            None => None,
        };
        node.ok_or_else(|| {
            Error::structure(format!(
                "{} has no schema element to resolve from",
                self.type_display_name(id)
            ))
        })
    }

    fn restore_node(&mut self, id: TypeId, node: Element) {
        match self.types.types.get_mut(id.0) {
            Some(TypeDefinition::Simple(st)) => st.node = Some(node),
            Some(TypeDefinition::Complex(ct)) => ct.node = Some(node),
            None => {}
        }
    }

    fn defer(&mut self, id: TypeId, node: Element, dependency: TypeId) -> Result<Resolution> {
        debug!(
            "holding off resolution of {} due to dependence on unresolved {}",
            self.type_display_name(id),
            self.type_display_name(dependency)
        );
        self.restore_node(id, node);
        Ok(Resolution::Deferred)
    }

    /// Primitive type reached by walking atomic base types from `id`
    fn primitive_of(&self, mut id: TypeId) -> TypeId {
        while let Some(st) = self.simple_type(id) {
            if st.is_primitive() {
                break;
            }
            match st.base_type {
                Some(base)
                    if base != id
                        && matches!(
                            self.simple_type(base).and_then(|b| b.variety.as_ref()),
                            Some(Variety::Atomic { .. })
                        ) =>
                {
                    id = base
                }
                _ => break,
            }
        }
        id
    }

    // =========================================================================
    // Simple types
    // =========================================================================

    fn resolve_simple_type(&mut self, id: TypeId) -> Result<Resolution> {
        let node = self.take_node(id)?;
        let final_set = derivation_attribute(&node, "final", DerivationSet::SIMPLE_FINAL)?;

        let mut forms = node.children.iter().filter(|child| {
            child.namespace() == Some(XSD_NAMESPACE)
                && matches!(child.local_name(), "list" | "restriction" | "union")
        });
        let form = forms.next();
        if let Some(extra) = forms.next() {
            return Err(extra.structure_error(
                "simpleType must contain only one of list, restriction or union",
            ));
        }

        let outcome = match form {
            None => SimpleOutcome::Complete {
                base: SIMPLE_UR_TYPE_ID,
                variety: self.default_variety(id),
                facets: Facets::new(),
            },
            Some(form) => match form.local_name() {
                "list" => self.simple_list(id, form)?,
                "restriction" => self.simple_restriction(id, form)?,
                _ => self.simple_union(form)?,
            },
        };

        match outcome {
            SimpleOutcome::Defer(dependency) => self.defer(id, node, dependency),
            SimpleOutcome::Complete {
                base,
                variety,
                facets,
            } => {
                let (base, variety) = if id == SIMPLE_UR_TYPE_ID {
                    (UR_TYPE_ID, Variety::Absent)
                } else {
                    (base, variety)
                };
                if let Some(TypeDefinition::Simple(st)) = self.types.types.get_mut(id.0) {
                    st.final_set = final_set;
                    st.facets = facets;
                    st.complete(base, variety);
                }
                Ok(Resolution::Resolved)
            }
        }
    }

    /// Variety of a definition restricting the simple ur-type
    fn default_variety(&self, id: TypeId) -> Variety {
        match self.simple_type(id) {
            Some(st) if st.is_primitive() => Variety::Atomic { primitive: id },
            _ => Variety::Absent,
        }
    }

    fn simple_list(&mut self, id: TypeId, list: &Element) -> Result<SimpleOutcome> {
        let nested = list.unique_child(Some(XSD_NAMESPACE), "simpleType", true)?;
        let item_type = match (list.get_attribute("itemType"), nested) {
            (Some(_), Some(_)) => {
                return Err(list.structure_error(
                    "itemType attribute and simpleType child are mutually exclusive",
                ))
            }
            (Some(name), None) => self.type_reference(list, name)?,
            (None, Some(child)) => self.dependent_simple_type(id, child)?,
            (None, None) => {
                return Err(list.structure_error(
                    "list requires an itemType attribute or a simpleType child",
                ))
            }
        };

        let item = self.simple_type(item_type).ok_or_else(|| {
            list.structure_error(format!(
                "item type {} must be a simple type",
                self.type_display_name(item_type)
            ))
        })?;
        if !item.is_resolved() {
            return Ok(SimpleOutcome::Defer(item_type));
        }
        if item.item_type().is_some() {
            return Err(list.structure_error(format!(
                "item type {} must not be a list",
                self.type_display_name(item_type)
            )));
        }
        Ok(SimpleOutcome::Complete {
            base: SIMPLE_UR_TYPE_ID,
            variety: Variety::List { item_type },
            facets: Facets::new(),
        })
    }

    fn simple_restriction(&mut self, id: TypeId, restriction: &Element) -> Result<SimpleOutcome> {
        let facets = Facets::from_restriction(restriction, &["simpleType"])?;
        if id == SIMPLE_UR_TYPE_ID {
            return Ok(SimpleOutcome::Complete {
                base: UR_TYPE_ID,
                variety: Variety::Absent,
                facets,
            });
        }

        let nested = restriction.unique_child(Some(XSD_NAMESPACE), "simpleType", true)?;
        let base = match (restriction.get_attribute("base"), nested) {
            (Some(_), Some(_)) => {
                return Err(restriction.structure_error(
                    "base attribute and simpleType child are mutually exclusive",
                ))
            }
            (Some(name), None) => self.type_reference(restriction, name)?,
            (None, Some(child)) => self.dependent_simple_type(id, child)?,
            (None, None) => {
                return Err(restriction.structure_error(
                    "restriction requires a base attribute or a simpleType child",
                ))
            }
        };

        let is_primitive = self.simple_type(id).is_some_and(|st| st.is_primitive());
        if is_primitive && (base == id || base == SIMPLE_UR_TYPE_ID) {
            return Ok(SimpleOutcome::Complete {
                base: SIMPLE_UR_TYPE_ID,
                variety: Variety::Atomic { primitive: id },
                facets,
            });
        }

        let base_type = self.simple_type(base).ok_or_else(|| {
            restriction.structure_error(format!(
                "base type {} of a simple type must be simple",
                self.type_display_name(base)
            ))
        })?;
        let variety = match &base_type.variety {
            None => return Ok(SimpleOutcome::Defer(base)),
            Some(Variety::Atomic { .. }) => Variety::Atomic {
                primitive: self.primitive_of(base),
            },
            Some(variety) => variety.clone(),
        };
        Ok(SimpleOutcome::Complete {
            base,
            variety,
            facets,
        })
    }

    fn simple_union(&mut self, union: &Element) -> Result<SimpleOutcome> {
        if union.has_attribute("memberTypes") {
            return Err(Error::Unimplemented(format!(
                "memberTypes of {} in {}",
                union.local_name(),
                union.describe()
            )));
        }
        let mut member_types = Vec::new();
        for child in union
            .children
            .iter()
            .filter(|c| c.is(Some(XSD_NAMESPACE), "simpleType"))
        {
            member_types.push(self.anonymous_simple_type(child)?);
        }
        if member_types.is_empty() {
            return Err(union.structure_error("union requires member types"));
        }
        Ok(SimpleOutcome::Complete {
            base: SIMPLE_UR_TYPE_ID,
            variety: Variety::Union { member_types },
            facets: Facets::new(),
        })
    }

    // =========================================================================
    // Complex types
    // =========================================================================

    fn resolve_complex_type(&mut self, id: TypeId) -> Result<Resolution> {
        let node = self.take_node(id)?;
        let is_abstract = bool_attribute(&node, "abstract")?;
        let final_set = derivation_attribute(&node, "final", DerivationSet::COMPLEX)?;
        let block = derivation_attribute(&node, "block", DerivationSet::COMPLEX)?;

        let outcome = self.complex_outcome(id, &node)?;
        let parts = match outcome {
            ComplexOutcome::Defer(dependency) => return self.defer(id, node, dependency),
            ComplexOutcome::Complete(parts) => parts,
        };

        if let Some(TypeDefinition::Complex(ct)) = self.types.types.get_mut(id.0) {
            ct.is_abstract = is_abstract;
            ct.final_set = final_set;
            ct.prohibited_substitutions = block;
            ct.base_type = Some(parts.base);
            ct.derivation = Some(parts.derivation);
            ct.content_type = Some(parts.content_type);
            ct.attribute_uses = parts.attribute_uses;
            ct.attribute_wildcard = parts.attribute_wildcard;
            ct.node = None;
        }
        Ok(Resolution::Resolved)
    }

    /// Base definition to derive from
    ///
    /// A schema redeclaring `anyType` derives from the ur-type singleton.
    fn base_definition(&self, base: TypeId) -> Option<TypeDefinition> {
        if base == UR_TYPE_ID && !self.is_type_resolved(base) {
            return Some(TypeDefinition::Complex(complex_ur_type(None).clone()));
        }
        self.types.get(base).cloned()
    }

    fn complex_outcome(&mut self, id: TypeId, node: &Element) -> Result<ComplexOutcome> {
        let mut wrappers = node.children.iter().filter(|child| {
            child.is(Some(XSD_NAMESPACE), "simpleContent")
                || child.is(Some(XSD_NAMESPACE), "complexContent")
        });
        let wrapper = wrappers.next();
        if let Some(extra) = wrappers.next() {
            return Err(extra.structure_error(
                "complexType must contain only one of simpleContent or complexContent",
            ));
        }

        let wrapper = match wrapper {
            Some(wrapper) => wrapper,
            None => {
                let mixed = bool_attribute(node, "mixed")?;
                let base = self.base_definition(UR_TYPE_ID).ok_or_else(|| {
                    Error::structure("the complex ur-type is missing from the schema")
                })?;
                return self
                    .complex_content(node, UR_TYPE_ID, &base, DerivationMethod::Restriction, mixed)
                    .map(ComplexOutcome::Complete);
            }
        };

        let mut derivations = wrapper
            .children
            .iter()
            .filter(|child| !child.is(Some(XSD_NAMESPACE), "annotation"));
        let derivation = match (derivations.next(), derivations.next()) {
            (Some(d), None)
                if d.is(Some(XSD_NAMESPACE), "restriction")
                    || d.is(Some(XSD_NAMESPACE), "extension") =>
            {
                d
            }
            _ => {
                return Err(wrapper.structure_error(format!(
                    "{} must contain exactly one restriction or extension",
                    wrapper.local_name()
                )))
            }
        };
        let method = if derivation.local_name() == "extension" {
            DerivationMethod::Extension
        } else {
            DerivationMethod::Restriction
        };
        let base_name = derivation.get_attribute("base").ok_or_else(|| {
            derivation.structure_error(format!("{} requires a base attribute", derivation.local_name()))
        })?;
        let base = self.type_reference(derivation, base_name)?;
        if base != UR_TYPE_ID && !self.is_type_resolved(base) {
            return Ok(ComplexOutcome::Defer(base));
        }
        let base_definition = self
            .base_definition(base)
            .ok_or_else(|| derivation.structure_error(format!("unknown type {}", base_name)))?;

        if wrapper.local_name() == "simpleContent" {
            return self.simple_content(id, derivation, base, &base_definition, method);
        }
        let mixed = match wrapper.get_attribute("mixed") {
            Some(_) => bool_attribute(wrapper, "mixed")?,
            None => bool_attribute(node, "mixed")?,
        };
        self.complex_content(derivation, base, &base_definition, method, mixed)
            .map(ComplexOutcome::Complete)
    }

    fn simple_content(
        &mut self,
        id: TypeId,
        derivation: &Element,
        base: TypeId,
        base_definition: &TypeDefinition,
        method: DerivationMethod,
    ) -> Result<ComplexOutcome> {
        let base_content = match base_definition {
            TypeDefinition::Simple(_) => None,
            TypeDefinition::Complex(ct) => match &ct.content_type {
                Some(ContentType::Simple(content)) => Some(*content),
                _ => None,
            },
        };

        let content = match method {
            DerivationMethod::Extension => match (base_definition, base_content) {
                (TypeDefinition::Simple(_), _) => base,
                (_, Some(content)) => content,
                _ => {
                    return Err(derivation.structure_error(
                        "simpleContent extension requires a simple type or a complex type with simple content",
                    ))
                }
            },
            DerivationMethod::Restriction => {
                let base_content = base_content.ok_or_else(|| {
                    derivation.structure_error(
                        "simpleContent restriction requires a complex base type with simple content",
                    )
                })?;
                match derivation.unique_child(Some(XSD_NAMESPACE), "simpleType", true)? {
                    Some(nested) => self.dependent_simple_type(id, nested)?,
                    None => match self.anonymous_dependency(id) {
                        Some(content) => content,
                        None => {
                            let variety = match self.simple_type(base_content).and_then(|st| st.variety.clone()) {
                                None => return Ok(ComplexOutcome::Defer(base_content)),
                                Some(Variety::Atomic { .. }) => Variety::Atomic {
                                    primitive: self.primitive_of(base_content),
                                },
                                Some(variety) => variety,
                            };
                            let facets = Facets::from_restriction(derivation, RESTRICTION_COMPONENTS)?;
                            let namespace = self.target_namespace.clone();
                            let st = SimpleTypeDefinition::anonymous_restriction(
                                namespace.as_deref(),
                                base_content,
                                variety,
                                facets,
                            );
                            let content = self.add_type(TypeDefinition::Simple(st))?;
                            self.set_anonymous_dependency(id, content);
                            content
                        }
                    },
                }
            }
        };

        let (attribute_uses, attribute_wildcard) =
            self.derive_attributes(derivation, base_definition, method)?;
        Ok(ComplexOutcome::Complete(ComplexParts {
            base,
            derivation: method,
            content_type: ContentType::Simple(content),
            attribute_uses,
            attribute_wildcard,
        }))
    }

    /// Content type of complex content
    fn complex_content(
        &mut self,
        content: &Element,
        base: TypeId,
        base_definition: &TypeDefinition,
        method: DerivationMethod,
        mixed: bool,
    ) -> Result<ComplexParts> {
        let base_type = base_definition
            .as_complex()
            .ok_or_else(|| content.structure_error("complexContent requires a complex base type"))?;
        let base_content = base_type.content_type.clone().unwrap_or(ContentType::Empty);
        if method == DerivationMethod::Extension {
            if let ContentType::Simple(_) = base_content {
                return Err(content.structure_error(
                    "complexContent cannot extend a type with simple content",
                ));
            }
        }

        let explicit = content.children.iter().find(|child| {
            child.namespace() == Some(XSD_NAMESPACE)
                && matches!(child.local_name(), "group" | "all" | "choice" | "sequence")
        });
        let particle = match explicit {
            Some(node) => Some(self.build_particle(node)?),
            None => None,
        };
        let explicit_empty = match &particle {
            None => true,
            Some(p) if p.max_occurs() == Some(0) => true,
            Some(p) => match &p.term {
                Term::ModelGroup(group) => {
                    group.is_empty()
                        && (group.compositor != Compositor::Choice || p.min_occurs() == 0)
                }
                _ => false,
            },
        };

        let restricted = |particle: Option<Particle>| match particle {
            Some(p) if !explicit_empty => {
                if mixed {
                    ContentType::Mixed(p)
                } else {
                    ContentType::ElementOnly(p)
                }
            }
            _ if mixed => ContentType::Mixed(Particle::with_occurs(
                Term::ModelGroup(ModelGroup::empty_sequence()),
                Occurs::once(),
            )),
            _ => ContentType::Empty,
        };

        let content_type = match method {
            DerivationMethod::Restriction => restricted(particle),
            DerivationMethod::Extension if explicit_empty => base_content,
            DerivationMethod::Extension => match base_content {
                ContentType::ElementOnly(base_particle) | ContentType::Mixed(base_particle) => {
                    let mut particles = vec![base_particle];
                    particles.extend(particle);
                    let sequence = Particle::with_occurs(
                        Term::ModelGroup(ModelGroup::new(Compositor::Sequence, particles)),
                        Occurs::once(),
                    );
                    if mixed {
                        ContentType::Mixed(sequence)
                    } else {
                        ContentType::ElementOnly(sequence)
                    }
                }
                _ => restricted(particle),
            },
        };

        let (attribute_uses, attribute_wildcard) =
            self.derive_attributes(content, base_definition, method)?;
        Ok(ComplexParts {
            base,
            derivation: method,
            content_type,
            attribute_uses,
            attribute_wildcard,
        })
    }

    /// Attribute uses and wildcard of a derivation
    fn derive_attributes(
        &mut self,
        content: &Element,
        base_definition: &TypeDefinition,
        method: DerivationMethod,
    ) -> Result<(AttributeUses, Option<Wildcard>)> {
        let local = self.build_attribute_uses(content)?;
        let (base_uses, base_wildcard) = match base_definition {
            TypeDefinition::Complex(ct) => (ct.attribute_uses.clone(), ct.attribute_wildcard.clone()),
            TypeDefinition::Simple(_) => (AttributeUses::new(), None),
        };

        match method {
            DerivationMethod::Extension => {
                let mut uses = base_uses;
                uses.extend(local.uses);
                let wildcard = match (local.wildcard, base_wildcard) {
                    (Some(local), Some(base)) => Some(local.unite(&base, content)?),
                    (local, base) => local.or(base),
                };
                Ok((uses, wildcard))
            }
            DerivationMethod::Restriction => {
                let mut uses: AttributeUses = base_uses
                    .into_iter()
                    .filter(|(name, _)| {
                        !local.prohibited.contains(name) && !local.uses.contains_key(name)
                    })
                    .collect();
                uses.extend(local.uses);
                Ok((uses, local.wildcard))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::schemas::Schema;

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    fn schema(body: &str) -> Schema {
        Schema::from_string(&format!(r#"<xs:schema {}>{}</xs:schema>"#, XS, body)).unwrap()
    }

    fn schema_err(body: &str) -> Error {
        Schema::from_string(&format!(r#"<xs:schema {}>{}</xs:schema>"#, XS, body)).unwrap_err()
    }

    #[test]
    fn test_restriction_of_builtin() {
        let schema = schema(r#"<xs:simpleType name="Grade"><xs:restriction base="xs:string"/></xs:simpleType>"#);
        let grade = schema.lookup_simple("Grade").unwrap();
        let string = schema.lookup("string").unwrap();
        assert_eq!(grade.base_type, Some(string));
        assert_eq!(grade.primitive_type(), Some(string));
    }

    #[test]
    fn test_primitive_walk_through_derived_builtins() {
        let schema = schema(r#"<xs:simpleType name="Small"><xs:restriction base="xs:byte"/></xs:simpleType>"#);
        assert_eq!(
            schema.lookup_simple("Small").unwrap().primitive_type(),
            schema.lookup("decimal")
        );
    }

    #[test]
    fn test_two_forms_is_structural() {
        let err = schema_err(
            r#"<xs:simpleType name="Bad">
                <xs:restriction base="xs:string"/><xs:list itemType="xs:string"/>
            </xs:simpleType>"#,
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_no_form_restricts_ur_type() {
        let schema = schema(r#"<xs:simpleType name="Anything"/>"#);
        let st = schema.lookup_simple("Anything").unwrap();
        assert_eq!(st.variety, Some(Variety::Absent));
        assert_eq!(st.base_type, Some(SIMPLE_UR_TYPE_ID));
    }

    #[test]
    fn test_list_of_list_rejected() {
        let err = schema_err(r#"<xs:simpleType name="L"><xs:list itemType="xs:NMTOKENS"/></xs:simpleType>"#);
        assert!(err.is_structural());
    }

    #[test]
    fn test_anonymous_list_item_must_not_be_list() {
        let err = schema_err(
            r#"<xs:simpleType name="Nested"><xs:list>
                <xs:simpleType><xs:list itemType="xs:int"/></xs:simpleType>
            </xs:list></xs:simpleType>"#,
        );
        assert!(err.is_structural());
        assert!(err.to_string().contains("must not be a list"));
        assert!(err.to_string().contains("schema/simpleType[@name='Nested']/list"));

        let err = schema_err(
            r#"<xs:simpleType name="Nested"><xs:list>
                <xs:simpleType><xs:restriction base="xs:NMTOKENS"/></xs:simpleType>
            </xs:list></xs:simpleType>"#,
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_anonymous_list_item_waits_for_its_base() {
        let schema = schema(
            r#"<xs:simpleType name="Codes"><xs:list>
                <xs:simpleType><xs:restriction base="Code"/></xs:simpleType>
            </xs:list></xs:simpleType>
            <xs:simpleType name="Code"><xs:restriction base="xs:token"/></xs:simpleType>"#,
        );
        let codes = schema.lookup_simple("Codes").unwrap();
        let item = schema.simple_type(codes.item_type().unwrap()).unwrap();
        assert!(item.is_resolved());
        assert_eq!(item.base_type, schema.lookup("Code"));
        assert_eq!(item.primitive_type(), schema.lookup("string"));
    }

    #[test]
    fn test_restriction_of_list_keeps_item_type() {
        let schema = schema(r#"<xs:simpleType name="Tokens"><xs:restriction base="xs:NMTOKENS"/></xs:simpleType>"#);
        let tokens = schema.lookup_simple("Tokens").unwrap();
        assert_eq!(tokens.base_type, schema.lookup("NMTOKENS"));
        assert_eq!(tokens.item_type(), schema.lookup("NMTOKEN"));
        assert!(tokens.member_types().is_none());
    }

    #[test]
    fn test_anonymous_list_item() {
        let schema = schema(
            r#"<xs:simpleType name="Codes"><xs:list>
                <xs:simpleType><xs:restriction base="xs:token"/></xs:simpleType>
            </xs:list></xs:simpleType>"#,
        );
        let codes = schema.lookup_simple("Codes").unwrap();
        let item = schema.simple_type(codes.item_type().unwrap()).unwrap();
        assert!(item.name.is_none());
        assert!(item.is_resolved());
        assert_eq!(item.base_type, schema.lookup("token"));
    }

    #[test]
    fn test_union_of_nested_members() {
        let schema = schema(
            r#"<xs:simpleType name="SizeOrAuto"><xs:union>
                <xs:simpleType><xs:restriction base="xs:int"/></xs:simpleType>
                <xs:simpleType><xs:restriction base="xs:token"/></xs:simpleType>
            </xs:union></xs:simpleType>"#,
        );
        let st = schema.lookup_simple("SizeOrAuto").unwrap();
        assert_eq!(st.member_types().unwrap().len(), 2);
        let id = schema.lookup("SizeOrAuto").unwrap();
        assert_eq!(schema.decode(id, "12").unwrap(), crate::components::codecs::XsdValue::Integer(12));
    }

    #[test]
    fn test_restriction_of_union_keeps_members() {
        let schema = schema(
            r#"<xs:simpleType name="SizeOrAuto"><xs:union>
                <xs:simpleType><xs:restriction base="xs:int"/></xs:simpleType>
                <xs:simpleType><xs:restriction base="xs:token"/></xs:simpleType>
            </xs:union></xs:simpleType>
            <xs:simpleType name="Size"><xs:restriction base="SizeOrAuto"/></xs:simpleType>"#,
        );
        let union = schema.lookup_simple("SizeOrAuto").unwrap();
        let size = schema.lookup_simple("Size").unwrap();
        assert_eq!(size.base_type, schema.lookup("SizeOrAuto"));
        assert_eq!(size.member_types(), union.member_types());
        assert_eq!(size.member_types().unwrap().len(), 2);
        assert!(size.item_type().is_none());
    }

    #[test]
    fn test_member_types_unimplemented() {
        let err = schema_err(r#"<xs:simpleType name="U"><xs:union memberTypes="xs:int xs:token"/></xs:simpleType>"#);
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[test]
    fn test_complex_base_for_simple_type() {
        let err = schema_err(
            r#"<xs:complexType name="C"/>
               <xs:simpleType name="S"><xs:restriction base="C"/></xs:simpleType>"#,
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_missing_base_attribute() {
        let err = schema_err(
            r#"<xs:complexType name="C"><xs:complexContent><xs:extension/></xs:complexContent></xs:complexType>"#,
        );
        assert!(err.to_string().contains("requires a base attribute"));
    }

    #[test]
    fn test_extension_appends_particle() {
        let schema = schema(
            r#"<xs:complexType name="Base"><xs:sequence><xs:element name="a" type="xs:string"/></xs:sequence></xs:complexType>
               <xs:complexType name="Derived"><xs:complexContent><xs:extension base="Base">
                 <xs:sequence><xs:element name="b" type="xs:int"/></xs:sequence>
               </xs:extension></xs:complexContent></xs:complexType>"#,
        );
        let derived = schema.lookup_complex("Derived").unwrap();
        assert_eq!(derived.derivation, Some(DerivationMethod::Extension));
        assert_eq!(derived.base_type, schema.lookup("Base"));
        let group = derived.content_type.as_ref().unwrap().particle().unwrap().model_group().unwrap();
        assert_eq!(group.compositor, Compositor::Sequence);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_extension_mixed_follows_derived_type() {
        let schema = schema(
            r#"<xs:complexType name="Note" mixed="true"><xs:sequence><xs:element name="b" type="xs:string"/></xs:sequence></xs:complexType>
               <xs:complexType name="Plain"><xs:complexContent><xs:extension base="Note">
                 <xs:sequence><xs:element name="i" type="xs:string"/></xs:sequence>
               </xs:extension></xs:complexContent></xs:complexType>
               <xs:complexType name="Rich" mixed="true"><xs:complexContent><xs:extension base="Note">
                 <xs:sequence><xs:element name="u" type="xs:string"/></xs:sequence>
               </xs:extension></xs:complexContent></xs:complexType>"#,
        );
        assert!(schema.lookup_complex("Note").unwrap().content_type.as_ref().unwrap().is_mixed());

        let plain = schema.lookup_complex("Plain").unwrap().content_type.clone().unwrap();
        assert!(matches!(plain, ContentType::ElementOnly(_)));
        assert_eq!(plain.particle().unwrap().model_group().unwrap().len(), 2);

        let rich = schema.lookup_complex("Rich").unwrap().content_type.clone().unwrap();
        assert!(rich.is_mixed());
    }

    #[test]
    fn test_mixed_empty_content() {
        let schema = schema(r#"<xs:complexType name="Text" mixed="true"/>"#);
        let content = schema.lookup_complex("Text").unwrap().content_type.clone().unwrap();
        assert!(content.is_mixed());
        assert!(content.particle().unwrap().model_group().unwrap().is_empty());
    }

    #[test]
    fn test_simple_content_extension_and_restriction() {
        let schema = schema(
            r#"<xs:complexType name="Price"><xs:simpleContent><xs:extension base="xs:decimal">
                 <xs:attribute name="currency" type="xs:token" use="required"/>
               </xs:extension></xs:simpleContent></xs:complexType>
               <xs:complexType name="SmallPrice"><xs:simpleContent><xs:restriction base="Price">
                 <xs:maxInclusive value="100"/>
               </xs:restriction></xs:simpleContent></xs:complexType>"#,
        );
        let decimal = schema.lookup("decimal").unwrap();
        let price = schema.lookup_complex("Price").unwrap();
        assert_eq!(price.content_type, Some(ContentType::Simple(decimal)));
        assert_eq!(price.attribute_uses.len(), 1);

        let small = schema.lookup_complex("SmallPrice").unwrap();
        let content = small.content_type.as_ref().unwrap().simple_type().unwrap();
        let content = schema.simple_type(content).unwrap();
        assert_eq!(content.base_type, Some(decimal));
        assert_eq!(content.facets.get("maxInclusive").unwrap().value, "100");
        assert_eq!(small.attribute_uses.len(), 1);
    }

    #[test]
    fn test_simple_content_restriction_needs_simple_base() {
        let err = schema_err(
            r#"<xs:complexType name="C"><xs:simpleContent><xs:restriction base="xs:anyType"/></xs:simpleContent></xs:complexType>"#,
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_complex_flags() {
        let schema = schema(r##"<xs:complexType name="Shape" abstract="true" final="#all" block="extension"/>"##);
        let shape = schema.lookup_complex("Shape").unwrap();
        assert!(shape.is_abstract);
        assert!(shape.final_set.extension && shape.final_set.restriction);
        assert!(shape.prohibited_substitutions.extension);
        assert!(!shape.prohibited_substitutions.restriction);
    }

    #[test]
    fn test_resolve_twice_is_noop() {
        let mut schema = schema(r#"<xs:simpleType name="Grade"><xs:restriction base="xs:string"/></xs:simpleType>"#);
        let id = schema.lookup("Grade").unwrap();
        let before = format!("{:?}", schema.type_definition(id).unwrap());
        assert_eq!(schema.resolve_type(id).unwrap(), Resolution::Resolved);
        assert_eq!(format!("{:?}", schema.type_definition(id).unwrap()), before);
    }
}
