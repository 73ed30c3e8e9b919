//! Construction of components from a schema document
//!
//! [`Schema::build`] walks the children of the `schema` element twice.
//! The first sweep registers every named type definition and reserves a
//! handle for every other top-level component, so that the second sweep,
//! which builds declarations, groups and particles, can refer to any of
//! them regardless of document order. Type definitions are resolved last.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::names::validate_ncname;
use crate::namespaces::QName;
use crate::XSD_NAMESPACE;

use super::annotations::Annotation;
use super::attributes::{
    AttributeDeclaration, AttributeGroupDefinition, AttributeUse, AttributeUses,
};
use super::base::{
    AttributeDeclId, AttributeGroupId, DerivationSet, ElementDeclId, IdentityConstraintId,
    ModelGroupDefId, NotationId, Scope, TypeDefinition, ValueConstraint, SIMPLE_UR_TYPE_ID,
    UR_TYPE_ID,
};
use super::complex_types::ComplexTypeDefinition;
use super::elements::ElementDeclaration;
use super::groups::{Compositor, ModelGroup, ModelGroupDefinition};
use super::identities::{IdentityConstraintCategory, IdentityConstraintDefinition};
use super::notations::NotationDeclaration;
use super::particles::{Occurs, Particle, Term};
use super::resolver::{bool_attribute, derivation_attribute};
use super::schemas::Schema;
use super::simple_types::SimpleTypeDefinition;
use super::wildcards::Wildcard;

/// Attribute uses declared directly on a complex type or attribute group
#[derive(Debug, Default)]
pub(crate) struct LocalAttributes {
    /// Uses, including those of referenced attribute groups
    pub(crate) uses: AttributeUses,
    /// Names declared with `use="prohibited"`
    pub(crate) prohibited: HashSet<QName>,
    /// Complete attribute wildcard
    pub(crate) wildcard: Option<Wildcard>,
}

/// Name of a top-level component; required and must be an NCName
fn global_name(node: &Element) -> Result<&str> {
    let name = node
        .get_attribute("name")
        .ok_or_else(|| node.structure_error(format!("top-level {} requires a name", node.local_name())))?;
    validate_ncname(name.trim())
        .map_err(|_| node.structure_error(format!("invalid name '{}'", name)))?;
    Ok(name.trim())
}

/// Parse a `form`-like attribute: `qualified` or `unqualified`
fn form_attribute(node: &Element, name: &str) -> Result<Option<bool>> {
    match node.get_attribute(name).map(str::trim) {
        None => Ok(None),
        Some("qualified") => Ok(Some(true)),
        Some("unqualified") => Ok(Some(false)),
        Some(other) => Err(node.structure_error(format!("invalid {} value '{}'", name, other))),
    }
}

/// Default or fixed value of an attribute or element declaration
fn value_constraint(node: &Element) -> Result<Option<ValueConstraint>> {
    match (node.get_attribute("default"), node.get_attribute("fixed")) {
        (Some(_), Some(_)) => Err(node.structure_error(
            "'default' and 'fixed' attributes are mutually exclusive",
        )),
        (Some(value), None) => Ok(Some(ValueConstraint::Default(value.to_string()))),
        (None, Some(value)) => Ok(Some(ValueConstraint::Fixed(value.to_string()))),
        (None, None) => Ok(None),
    }
}

fn is_xsd(node: &Element) -> bool {
    node.namespace() == Some(XSD_NAMESPACE)
}

impl Schema {
    /// Build the components of a `schema` element and resolve them
    pub fn build(&mut self, root: &Element) -> Result<()> {
        if !root.is(Some(XSD_NAMESPACE), "schema") {
            return Err(root.structure_error(format!(
                "root element must be an XSD schema element, not {}",
                root.qname
            )));
        }
        self.target_namespace = root
            .get_attribute("targetNamespace")
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(String::from);
        self.qualified_elements = form_attribute(root, "elementFormDefault")?.unwrap_or(false);
        self.qualified_attributes = form_attribute(root, "attributeFormDefault")?.unwrap_or(false);

        self.declare_globals(root)?;
        self.build_globals(root)?;
        self.resolve_all()?;
        self.link_substitution_groups()?;
        self.link_keyrefs()?;

        debug!(
            types = self.type_count(),
            elements = self.elements.len(),
            attributes = self.attributes.len(),
            "schema components built"
        );
        Ok(())
    }

    // =========================================================================
    // First sweep
    // =========================================================================

    fn declare_globals(&mut self, root: &Element) -> Result<()> {
        let namespace = self.target_namespace.clone();
        let namespace = namespace.as_deref();

        for child in root.children.iter().filter(|c| is_xsd(c)) {
            match child.local_name() {
                "simpleType" => {
                    let name = global_name(child)?;
                    let st = SimpleTypeDefinition::unresolved(Some(name), namespace, child.clone());
                    self.register(TypeDefinition::Simple(st))?;
                }
                "complexType" => {
                    let name = global_name(child)?;
                    let ct = ComplexTypeDefinition::unresolved(Some(name), namespace, child.clone());
                    self.register(TypeDefinition::Complex(ct))?;
                }
                "group" => {
                    let name = global_name(child)?;
                    if self.model_group_names.contains_key(name) {
                        return Err(child.structure_error(format!("duplicate group {}", name)));
                    }
                    let id = ModelGroupDefId(self.model_groups.len());
                    self.model_groups.push(ModelGroupDefinition::placeholder(name, namespace));
                    self.model_group_names.insert(name.to_string(), id);
                }
                "attributeGroup" => {
                    let name = global_name(child)?;
                    if self.attribute_group_names.contains_key(name) {
                        return Err(child.structure_error(format!("duplicate attributeGroup {}", name)));
                    }
                    let id = AttributeGroupId(self.attribute_groups.len());
                    self.attribute_groups.push(AttributeGroupDefinition::placeholder(name, namespace));
                    self.attribute_group_names.insert(name.to_string(), id);
                    self.pending_attribute_groups.insert(id, child.clone());
                }
                "element" => {
                    let name = global_name(child)?;
                    if self.element_names.contains_key(name) {
                        return Err(child.structure_error(format!("duplicate element {}", name)));
                    }
                    let id = ElementDeclId(self.elements.len());
                    self.elements.push(ElementDeclaration::new(name, namespace, Scope::Global));
                    self.element_names.insert(name.to_string(), id);
                }
                "attribute" => {
                    let name = global_name(child)?;
                    if self.attribute_names.contains_key(name) {
                        return Err(child.structure_error(format!("duplicate attribute {}", name)));
                    }
                    let id = AttributeDeclId(self.attributes.len());
                    self.attributes.push(AttributeDeclaration::new(name, namespace, Scope::Global));
                    self.attribute_names.insert(name.to_string(), id);
                }
                _ => {}
            }
        }
        Ok(())
    }

    // =========================================================================
    // Second sweep
    // =========================================================================

    fn build_globals(&mut self, root: &Element) -> Result<()> {
        for child in &root.children {
            if !is_xsd(child) {
                warn!("skipping unknown top-level schema element {}", child.qname);
                continue;
            }
            match child.local_name() {
                "annotation" => self.annotations.push(Annotation::from_element(child)),
                "simpleType" | "complexType" => {}
                "attribute" => {
                    let id = self.attribute_names[global_name(child)?];
                    let declaration = self.build_attribute_declaration(child, Scope::Global)?;
                    self.attributes[id.0] = declaration;
                }
                "attributeGroup" => {
                    let id = self.attribute_group_names[global_name(child)?];
                    self.ensure_attribute_group(id)?;
                }
                "group" => self.build_model_group_definition(child)?,
                "element" => {
                    let id = self.element_names[global_name(child)?];
                    let declaration = self.build_element(child, Scope::Global)?;
                    self.elements[id.0] = declaration;
                }
                "notation" => {
                    let namespace = self.target_namespace.clone();
                    let notation = NotationDeclaration::from_element(child, namespace.as_deref())?;
                    if self.notation_names.contains_key(&notation.name) {
                        return Err(child.structure_error(format!("duplicate notation {}", notation.name)));
                    }
                    let id = NotationId(self.notations.len());
                    self.notation_names.insert(notation.name.clone(), id);
                    self.notations.push(notation);
                }
                "include" | "import" | "redefine" => {
                    return Err(Error::Unimplemented(format!(
                        "{} of other schema documents",
                        child.local_name()
                    )))
                }
                other => warn!("skipping unknown top-level schema element {}", other),
            }
        }
        Ok(())
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn build_attribute_declaration(&mut self, node: &Element, scope: Scope) -> Result<AttributeDeclaration> {
        let name = node
            .get_attribute("name")
            .map(str::trim)
            .ok_or_else(|| node.structure_error("attribute requires a name or a ref"))?;
        validate_ncname(name).map_err(|_| node.structure_error(format!("invalid name '{}'", name)))?;

        let namespace = match scope {
            Scope::Global => self.target_namespace.clone(),
            Scope::Local => {
                let qualified = form_attribute(node, "form")?.unwrap_or(self.qualified_attributes);
                self.target_namespace.clone().filter(|_| qualified)
            }
        };

        let mut declaration = AttributeDeclaration::new(name, namespace.as_deref(), scope);
        let nested = node.unique_child(Some(XSD_NAMESPACE), "simpleType", true)?;
        declaration.type_definition = match (node.get_attribute("type"), nested) {
            (Some(_), Some(_)) => {
                return Err(node.structure_error(
                    "type attribute and simpleType child are mutually exclusive",
                ))
            }
            (Some(value), None) => {
                let id = self.type_reference(node, value)?;
                if self.simple_type(id).is_none() {
                    return Err(node.structure_error(format!(
                        "type {} of an attribute must be a simple type",
                        value
                    )));
                }
                id
            }
            (None, Some(child)) => self.anonymous_simple_type(child)?,
            (None, None) => SIMPLE_UR_TYPE_ID,
        };
        declaration.value_constraint = value_constraint(node)?;
        declaration.annotation = Annotation::of(node);
        Ok(declaration)
    }

    /// Collect attribute uses and the attribute wildcard of `content`
    ///
    /// `content` is a complex type, its `restriction`/`extension` element
    /// or an attribute group definition.
    pub(crate) fn build_attribute_uses(&mut self, content: &Element) -> Result<LocalAttributes> {
        let mut local = LocalAttributes::default();
        let mut group_wildcards: Vec<Wildcard> = Vec::new();

        for child in content.children.iter().filter(|c| is_xsd(c)) {
            match child.local_name() {
                "attribute" => {
                    let (required, prohibited) = match child.get_attribute("use").map(str::trim) {
                        None | Some("optional") => (false, false),
                        Some("required") => (true, false),
                        Some("prohibited") => (false, true),
                        Some(other) => {
                            return Err(child.structure_error(format!("invalid use value '{}'", other)))
                        }
                    };
                    let constraint = value_constraint(child)?;
                    if required && matches!(constraint, Some(ValueConstraint::Default(_))) {
                        return Err(child.structure_error(
                            "an attribute with a default value must be optional",
                        ));
                    }

                    let (declaration, qname) = match child.get_attribute("ref") {
                        Some(reference) => {
                            if child.has_attribute("name") {
                                return Err(child.structure_error(
                                    "ref and name attributes are mutually exclusive",
                                ));
                            }
                            let qname = self.reference_name(child, reference)?;
                            let id = self
                                .attribute_names
                                .get(&qname.local_name)
                                .copied()
                                .ok_or_else(|| {
                                    child.structure_error(format!("unknown attribute {}", reference))
                                })?;
                            (id, self.attributes[id.0].qname())
                        }
                        None => {
                            let declaration = self.build_attribute_declaration(child, Scope::Local)?;
                            let qname = declaration.qname();
                            let id = AttributeDeclId(self.attributes.len());
                            self.attributes.push(declaration);
                            (id, qname)
                        }
                    };

                    if prohibited {
                        local.prohibited.insert(qname);
                    } else if local.uses.contains_key(&qname) {
                        return Err(child.structure_error(format!("duplicate attribute {}", qname)));
                    } else {
                        local.uses.insert(
                            qname,
                            AttributeUse {
                                required,
                                declaration,
                                value_constraint: constraint,
                            },
                        );
                    }
                }
                "attributeGroup" => {
                    let reference = child.get_attribute("ref").ok_or_else(|| {
                        child.structure_error("attributeGroup reference requires a ref attribute")
                    })?;
                    let qname = self.reference_name(child, reference)?;
                    let id = self
                        .attribute_group_names
                        .get(&qname.local_name)
                        .copied()
                        .ok_or_else(|| {
                            child.structure_error(format!("unknown attributeGroup {}", reference))
                        })?;
                    self.ensure_attribute_group(id)?;
                    let group = &self.attribute_groups[id.0];
                    for (name, attribute_use) in &group.attribute_uses {
                        local.uses.insert(name.clone(), attribute_use.clone());
                    }
                    if let Some(wildcard) = &group.attribute_wildcard {
                        group_wildcards.push(wildcard.clone());
                    }
                }
                "anyAttribute" => {
                    if local.wildcard.is_some() {
                        return Err(content.structure_error("more than one anyAttribute"));
                    }
                    let namespace = self.target_namespace.clone();
                    local.wildcard = Some(Wildcard::from_element(child, namespace.as_deref())?);
                }
                _ => {}
            }
        }

        for wildcard in group_wildcards {
            local.wildcard = Some(match local.wildcard {
                Some(current) => current.intersect(&wildcard, content)?,
                None => wildcard,
            });
        }
        Ok(local)
    }

    /// Build an attribute group definition if it is still pending
    ///
    /// Groups are built on first reference, so a group may be referenced
    /// before it appears in the document. A group reaching itself through
    /// references is a structural error.
    pub(crate) fn ensure_attribute_group(&mut self, id: AttributeGroupId) -> Result<()> {
        let node = match self.pending_attribute_groups.remove(&id) {
            Some(node) => node,
            None if self.building_attribute_groups.contains(&id) => {
                return Err(Error::structure(format!(
                    "circular definition of attributeGroup {}",
                    self.attribute_groups[id.0].name
                )))
            }
            None => return Ok(()),
        };

        self.building_attribute_groups.insert(id);
        let local = self.build_attribute_uses(&node)?;
        self.building_attribute_groups.remove(&id);

        let group = &mut self.attribute_groups[id.0];
        group.attribute_uses = local.uses;
        group.attribute_wildcard = local.wildcard;
        group.annotation = Annotation::of(&node);
        Ok(())
    }

    // =========================================================================
    // Model groups and particles
    // =========================================================================

    fn build_model_group_definition(&mut self, node: &Element) -> Result<()> {
        let name = global_name(node)?;
        let id = self.model_group_names[name];
        if node.has_attribute("ref") {
            return Err(node.structure_error("a top-level group must not have a ref attribute"));
        }

        let mut groups = node.children.iter().filter(|c| {
            is_xsd(c) && matches!(c.local_name(), "all" | "choice" | "sequence")
        });
        let group_node = groups.next().ok_or_else(|| {
            node.structure_error("group requires one of all, choice or sequence")
        })?;
        if groups.next().is_some() {
            return Err(node.structure_error("group must contain only one of all, choice or sequence"));
        }

        let model_group = self.build_model_group(group_node)?;
        let definition = &mut self.model_groups[id.0];
        definition.model_group = model_group;
        definition.annotation = Annotation::of(node);
        Ok(())
    }

    fn build_model_group(&mut self, node: &Element) -> Result<ModelGroup> {
        let compositor = Compositor::from_tag(node.local_name())
            .ok_or_else(|| node.structure_error(format!("{} is not a model group", node.local_name())))?;
        let mut particles = Vec::new();
        for child in &node.children {
            if child.is(Some(XSD_NAMESPACE), "annotation") {
                continue;
            }
            if compositor == Compositor::All && !child.is(Some(XSD_NAMESPACE), "element") {
                return Err(child.structure_error("all may only contain elements"));
            }
            particles.push(self.build_particle(child)?);
        }
        Ok(ModelGroup::new(compositor, particles))
    }

    /// Build a particle from an `element`, `any`, `group` or compositor element
    pub(crate) fn build_particle(&mut self, node: &Element) -> Result<Particle> {
        if !is_xsd(node) {
            return Err(node.structure_error(format!("unexpected {} in content model", node.qname)));
        }
        let occurs = Occurs::from_element(node)?;
        let term = match node.local_name() {
            "element" => Term::Element(self.local_element(node)?),
            "any" => {
                let namespace = self.target_namespace.clone();
                Term::Wildcard(Wildcard::from_element(node, namespace.as_deref())?)
            }
            "group" => {
                let reference = node
                    .get_attribute("ref")
                    .ok_or_else(|| node.structure_error("group reference requires a ref attribute"))?;
                let qname = self.reference_name(node, reference)?;
                let id = self
                    .model_group_names
                    .get(&qname.local_name)
                    .copied()
                    .ok_or_else(|| node.structure_error(format!("unknown group {}", reference)))?;
                Term::GroupDefinition(id)
            }
            "sequence" | "choice" | "all" => Term::ModelGroup(self.build_model_group(node)?),
            other => {
                return Err(node.structure_error(format!("unexpected {} in content model", other)))
            }
        };
        Ok(Particle::with_occurs(term, occurs))
    }

    // =========================================================================
    // Elements
    // =========================================================================

    fn local_element(&mut self, node: &Element) -> Result<ElementDeclId> {
        match node.get_attribute("ref") {
            Some(reference) => {
                if node.has_attribute("name") {
                    return Err(node.structure_error("ref and name attributes are mutually exclusive"));
                }
                let qname = self.reference_name(node, reference)?;
                self.element_names
                    .get(&qname.local_name)
                    .copied()
                    .ok_or_else(|| node.structure_error(format!("unknown element {}", reference)))
            }
            None => {
                let declaration = self.build_element(node, Scope::Local)?;
                let id = ElementDeclId(self.elements.len());
                self.elements.push(declaration);
                Ok(id)
            }
        }
    }

    fn build_element(&mut self, node: &Element, scope: Scope) -> Result<ElementDeclaration> {
        let name = node
            .get_attribute("name")
            .map(str::trim)
            .ok_or_else(|| node.structure_error("element requires a name or a ref"))?;
        validate_ncname(name).map_err(|_| node.structure_error(format!("invalid name '{}'", name)))?;

        let namespace = match scope {
            Scope::Global => self.target_namespace.clone(),
            Scope::Local => {
                let qualified = form_attribute(node, "form")?.unwrap_or(self.qualified_elements);
                self.target_namespace.clone().filter(|_| qualified)
            }
        };
        let mut declaration = ElementDeclaration::new(name, namespace.as_deref(), scope);

        if let Some(head) = node.get_attribute("substitutionGroup") {
            if scope == Scope::Local {
                return Err(node.structure_error("a local element cannot join a substitution group"));
            }
            declaration.substitution_group_name = Some(self.reference_name(node, head)?);
        }

        let mut inline_types = node.children.iter().filter(|c| {
            is_xsd(c) && matches!(c.local_name(), "simpleType" | "complexType")
        });
        let inline = inline_types.next();
        if inline_types.next().is_some() {
            return Err(node.structure_error("element must contain at most one inline type"));
        }
        declaration.type_definition = match (node.get_attribute("type"), inline) {
            (Some(_), Some(_)) => {
                return Err(node.structure_error(
                    "type attribute and inline type are mutually exclusive",
                ))
            }
            (Some(value), None) => self.type_reference(node, value)?,
            (None, Some(child)) if child.local_name() == "simpleType" => self.anonymous_simple_type(child)?,
            (None, Some(child)) => self.anonymous_complex_type(child)?,
            (None, None) => {
                declaration.type_from_head = declaration.substitution_group_name.is_some();
                UR_TYPE_ID
            }
        };

        declaration.value_constraint = value_constraint(node)?;
        declaration.nillable = bool_attribute(node, "nillable")?;
        declaration.is_abstract = bool_attribute(node, "abstract")?;
        declaration.substitution_group_exclusions =
            derivation_attribute(node, "final", DerivationSet::COMPLEX)?;
        declaration.disallowed_substitutions =
            derivation_attribute(node, "block", DerivationSet::ELEMENT_BLOCK)?;

        for child in node.children.iter().filter(|c| is_xsd(c)) {
            if let Some(category) = IdentityConstraintCategory::from_tag(child.local_name()) {
                let id = self.add_identity_constraint(child, category)?;
                declaration.identity_constraints.push(id);
            }
        }
        declaration.annotation = Annotation::of(node);
        Ok(declaration)
    }

    fn add_identity_constraint(
        &mut self,
        node: &Element,
        category: IdentityConstraintCategory,
    ) -> Result<IdentityConstraintId> {
        let namespace = self.target_namespace.clone();
        let definition = IdentityConstraintDefinition::from_element(node, category, namespace.as_deref())?;
        if self.identity_names.contains_key(&definition.name) {
            return Err(node.structure_error(format!(
                "duplicate identity constraint {}",
                definition.name
            )));
        }
        let id = IdentityConstraintId(self.identities.len());
        self.identity_names.insert(definition.name.clone(), id);
        self.identities.push(definition);
        Ok(id)
    }

    // =========================================================================
    // Linking
    // =========================================================================

    /// Link substitution group members to their heads
    ///
    /// Members declared without a type take the type of their head.
    fn link_substitution_groups(&mut self) -> Result<()> {
        for index in 0..self.elements.len() {
            let head_name = match &self.elements[index].substitution_group_name {
                Some(name) => name.clone(),
                None => continue,
            };
            let head = self.element_names.get(&head_name.local_name).copied().ok_or_else(|| {
                Error::structure(format!(
                    "unknown substitution group head {} of element {}",
                    head_name, self.elements[index].name
                ))
            })?;
            self.elements[index].substitution_group = Some(head);
        }

        for index in 0..self.elements.len() {
            if !self.elements[index].type_from_head {
                continue;
            }
            let mut current = ElementDeclId(index);
            let mut steps = 0;
            let type_definition = loop {
                let element = &self.elements[current.0];
                match element.substitution_group {
                    Some(head) if element.type_from_head => current = head,
                    _ => break element.type_definition,
                }
                steps += 1;
                if steps > self.elements.len() {
                    return Err(Error::structure(format!(
                        "circular substitution group involving element {}",
                        self.elements[index].name
                    )));
                }
            };
            self.elements[index].type_definition = type_definition;
        }
        Ok(())
    }

    /// Link keyrefs to the key or unique constraint they refer to
    fn link_keyrefs(&mut self) -> Result<()> {
        for index in 0..self.identities.len() {
            let refer = match &self.identities[index].refer {
                Some(refer) => refer.clone(),
                None => continue,
            };
            let key = self
                .identity_names
                .get(&refer.local_name)
                .copied()
                .filter(|id| self.identities[id.0].category != IdentityConstraintCategory::KeyRef)
                .ok_or_else(|| {
                    Error::structure(format!(
                        "keyref {} refers to unknown key {}",
                        self.identities[index].name, refer
                    ))
                })?;
            self.identities[index].referenced_key = Some(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::base::Component;
    use crate::components::complex_types::ContentType;
    use crate::components::wildcards::NamespaceConstraint;
    use pretty_assertions::assert_eq;

    fn build(body: &str) -> Result<Schema> {
        Schema::from_string(&format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:test" targetNamespace="urn:test">{}</xs:schema>"#,
            body
        ))
    }

    #[test]
    fn test_root_must_be_schema() {
        let err = Schema::from_string(r#"<xs:element xmlns:xs="http://www.w3.org/2001/XMLSchema" name="x"/>"#)
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_top_level_type_requires_name() {
        let err = build(r#"<xs:simpleType><xs:restriction base="xs:string"/></xs:simpleType>"#).unwrap_err();
        assert!(err.to_string().contains("requires a name"));
    }

    #[test]
    fn test_global_element_with_inline_type() {
        let schema = build(
            r#"<xs:element name="order">
                 <xs:complexType><xs:sequence>
                   <xs:element name="item" type="xs:string" maxOccurs="unbounded"/>
                 </xs:sequence></xs:complexType>
               </xs:element>"#,
        )
        .unwrap();
        let order = schema.element_declaration("order").unwrap();
        assert_eq!(order.namespace.as_deref(), Some("urn:test"));
        let ct = schema.complex_type(order.type_definition).unwrap();
        assert!(ct.name.is_none());
        let particle = &ct.content_type.as_ref().unwrap().particle().unwrap().model_group().unwrap().particles[0];
        assert_eq!(particle.max_occurs(), None);
        match particle.term {
            Term::Element(id) => {
                let item = schema.element(id).unwrap();
                assert_eq!(item.scope, Scope::Local);
                assert_eq!(item.namespace, None);
                assert_eq!(item.type_definition, schema.lookup("string").unwrap());
            }
            ref other => panic!("unexpected term {:?}", other),
        }
    }

    #[test]
    fn test_element_form_default() {
        let schema = Schema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:q"
                          elementFormDefault="qualified">
                 <xs:complexType name="T"><xs:sequence><xs:element name="a"/></xs:sequence></xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        let ct = schema.lookup_complex("T").unwrap();
        let group = ct.content_type.as_ref().unwrap().particle().unwrap().model_group().unwrap();
        match group.particles[0].term {
            Term::Element(id) => assert_eq!(schema.element(id).unwrap().namespace.as_deref(), Some("urn:q")),
            ref other => panic!("unexpected term {:?}", other),
        }
    }

    #[test]
    fn test_attribute_group_forward_reference() {
        let schema = build(
            r###"<xs:complexType name="Item">
                 <xs:attributeGroup ref="t:common"/>
                 <xs:attribute name="sku" type="xs:token" use="required"/>
               </xs:complexType>
               <xs:attributeGroup name="common">
                 <xs:attribute name="id" type="xs:ID"/>
                 <xs:anyAttribute namespace="##other" processContents="lax"/>
               </xs:attributeGroup>"###,
        )
        .unwrap();
        let item = schema.lookup_complex("Item").unwrap();
        let names: Vec<String> = item.attribute_uses.keys().map(|q| q.local_name.clone()).collect();
        assert_eq!(names, vec!["id", "sku"]);
        assert!(item.attribute_uses[&QName::local("sku")].required);
        let wildcard = item.attribute_wildcard.as_ref().unwrap();
        assert_eq!(wildcard.namespace_constraint, NamespaceConstraint::Not(Some("urn:test".into())));
        assert!(schema.attribute_group_definition("common").unwrap().attribute_wildcard.is_some());
    }

    #[test]
    fn test_attribute_group_cycle() {
        let err = build(
            r#"<xs:attributeGroup name="a"><xs:attributeGroup ref="t:b"/></xs:attributeGroup>
               <xs:attributeGroup name="b"><xs:attributeGroup ref="t:a"/></xs:attributeGroup>"#,
        )
        .unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn test_prohibited_attribute_in_restriction() {
        let schema = build(
            r#"<xs:complexType name="Base">
                 <xs:attribute name="a" type="xs:string"/><xs:attribute name="b" type="xs:string"/>
               </xs:complexType>
               <xs:complexType name="Narrow"><xs:complexContent><xs:restriction base="t:Base">
                 <xs:attribute name="b" use="prohibited"/>
               </xs:restriction></xs:complexContent></xs:complexType>"#,
        )
        .unwrap();
        let narrow = schema.lookup_complex("Narrow").unwrap();
        assert_eq!(narrow.attribute_uses.len(), 1);
        assert!(narrow.attribute_uses.contains_key(&QName::local("a")));
    }

    #[test]
    fn test_model_group_definition_reference() {
        let schema = build(
            r#"<xs:group name="names"><xs:sequence>
                 <xs:element name="first" type="xs:string"/><xs:element name="last" type="xs:string"/>
               </xs:sequence></xs:group>
               <xs:complexType name="Person"><xs:group ref="t:names"/></xs:complexType>"#,
        )
        .unwrap();
        let names = schema.model_group_definition("names").unwrap();
        assert_eq!(names.model_group.len(), 2);
        let person = schema.lookup_complex("Person").unwrap();
        match &person.content_type {
            Some(ContentType::ElementOnly(particle)) => {
                assert!(matches!(particle.term, Term::GroupDefinition(_)))
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_all_accepts_only_elements() {
        let err = build(
            r#"<xs:complexType name="T"><xs:all><xs:any/></xs:all></xs:complexType>"#,
        )
        .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_substitution_group_inherits_type() {
        let schema = build(
            r#"<xs:element name="shape" type="xs:token" abstract="true"/>
               <xs:element name="circle" substitutionGroup="t:shape"/>
               <xs:element name="square" substitutionGroup="t:shape" type="xs:string"/>"#,
        )
        .unwrap();
        let shape = schema.element_declaration("shape").unwrap();
        assert!(shape.is_abstract);
        let circle = schema.element_declaration("circle").unwrap();
        assert!(circle.is_resolved());
        assert_eq!(circle.type_definition, shape.type_definition);
        let square = schema.element_declaration("square").unwrap();
        assert_eq!(square.type_definition, schema.lookup("string").unwrap());
    }

    #[test]
    fn test_unknown_substitution_head() {
        let err = build(r#"<xs:element name="circle" substitutionGroup="t:nothing"/>"#).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_keyref_linked() {
        let schema = build(
            r#"<xs:element name="catalog">
                 <xs:complexType><xs:sequence>
                   <xs:element name="item" maxOccurs="unbounded"/>
                 </xs:sequence></xs:complexType>
                 <xs:key name="itemKey"><xs:selector xpath="item"/><xs:field xpath="@id"/></xs:key>
                 <xs:keyref name="itemRef" refer="t:itemKey"><xs:selector xpath="ref"/><xs:field xpath="@to"/></xs:keyref>
               </xs:element>"#,
        )
        .unwrap();
        let catalog = schema.element_declaration("catalog").unwrap();
        assert_eq!(catalog.identity_constraints.len(), 2);
        let keyref = schema.identity_constraint("itemRef").unwrap();
        let key = schema.identity(keyref.referenced_key.unwrap()).unwrap();
        assert_eq!(key.name, "itemKey");
    }

    #[test]
    fn test_notation_and_annotation() {
        let schema = build(
            r#"<xs:annotation><xs:documentation>Shop</xs:documentation></xs:annotation>
               <xs:notation name="jpeg" public="image/jpeg"/>"#,
        )
        .unwrap();
        assert_eq!(schema.annotations[0].to_string(), "Shop");
        assert_eq!(schema.notation("jpeg").unwrap().public.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_import_unimplemented() {
        let err = build(r#"<xs:import namespace="urn:other"/>"#).unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[test]
    fn test_reference_to_foreign_namespace_unimplemented() {
        let err = Schema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:o="urn:other">
                 <xs:element name="e" type="o:Thing"/>
               </xs:schema>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)));
    }

    #[test]
    fn test_undeclared_type_is_structural() {
        let err = build(r#"<xs:element name="e" type="t:Missing"/>"#).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_unknown_top_level_is_skipped() {
        let schema = Schema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:x="urn:ext">
                 <x:extra/><xs:simpleType name="S"/>
               </xs:schema>"#,
        )
        .unwrap();
        assert!(schema.lookup_simple("S").is_some());
    }

    #[test]
    fn test_default_and_fixed_conflict() {
        let err = build(r#"<xs:attribute name="a" type="xs:string" default="x" fixed="y"/>"#).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_local_attribute_form() {
        let schema = build(
            r#"<xs:complexType name="T">
                 <xs:attribute name="plain"/><xs:attribute name="qualified" form="qualified"/>
               </xs:complexType>"#,
        )
        .unwrap();
        let t = schema.lookup_complex("T").unwrap();
        assert!(t.attribute_uses.contains_key(&QName::local("plain")));
        assert!(t.attribute_uses.contains_key(&QName::namespaced("urn:test", "qualified")));
    }
}
