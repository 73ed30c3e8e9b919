//! Schema registry
//!
//! A [`Schema`] is one document-processing session. It owns the arenas of
//! every component built from the document, the name tables used to look
//! them up, and the queue of type definitions still waiting for
//! resolution. The arenas start as a copy of the built-in template, so the
//! standard datatypes are always present.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::documents::{Document, Element};
use crate::error::{Error, Result};
use crate::limits::Limits;

use super::annotations::Annotation;
use super::attributes::{AttributeDeclaration, AttributeGroupDefinition};
use super::base::{
    AttributeDeclId, AttributeGroupId, Component, ElementDeclId, IdentityConstraintId,
    ModelGroupDefId, NotationId, TypeDefinition, TypeId,
};
use super::builtins::{builtin_types, TypeTable};
use super::codecs::{CodecRef, XsdValue};
use super::complex_types::ComplexTypeDefinition;
use super::elements::ElementDeclaration;
use super::groups::ModelGroupDefinition;
use super::identities::IdentityConstraintDefinition;
use super::notations::NotationDeclaration;
use super::simple_types::{SimpleTypeDefinition, Variety};

/// Outcome of registering a named type definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The definition was added under a new name
    Inserted(TypeId),
    /// A same-named built-in took over the definition's content
    Absorbed(TypeId),
}

impl Registration {
    /// Handle of the definition now registered under the name
    pub fn id(&self) -> TypeId {
        match self {
            Registration::Inserted(id) | Registration::Absorbed(id) => *id,
        }
    }
}

/// Outcome of one resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The definition is resolved
    Resolved,
    /// A dependency is still unresolved; try again on a later pass
    Deferred,
}

/// Components of one schema document
#[derive(Debug, Clone)]
pub struct Schema {
    /// `targetNamespace` of the schema document
    pub target_namespace: Option<String>,
    /// Schema-level annotations
    pub annotations: Vec<Annotation>,

    pub(crate) types: TypeTable,
    pub(crate) elements: Vec<ElementDeclaration>,
    pub(crate) element_names: IndexMap<String, ElementDeclId>,
    pub(crate) attributes: Vec<AttributeDeclaration>,
    pub(crate) attribute_names: IndexMap<String, AttributeDeclId>,
    pub(crate) attribute_groups: Vec<AttributeGroupDefinition>,
    pub(crate) attribute_group_names: IndexMap<String, AttributeGroupId>,
    pub(crate) model_groups: Vec<ModelGroupDefinition>,
    pub(crate) model_group_names: IndexMap<String, ModelGroupDefId>,
    pub(crate) identities: Vec<IdentityConstraintDefinition>,
    pub(crate) identity_names: IndexMap<String, IdentityConstraintId>,
    pub(crate) notations: Vec<NotationDeclaration>,
    pub(crate) notation_names: IndexMap<String, NotationId>,

    /// `elementFormDefault="qualified"`
    pub(crate) qualified_elements: bool,
    /// `attributeFormDefault="qualified"`
    pub(crate) qualified_attributes: bool,
    /// Attribute group elements not built yet
    pub(crate) pending_attribute_groups: HashMap<AttributeGroupId, Element>,
    /// Attribute groups being built, for cycle detection
    pub(crate) building_attribute_groups: HashSet<AttributeGroupId>,

    /// Names of the type definitions the schema document declares
    schema_type_names: HashSet<String>,
    unresolved: Vec<TypeId>,
    limits: Limits,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create an empty session holding only the built-in types
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an empty session with custom limits
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            target_namespace: None,
            annotations: Vec::new(),
            types: builtin_types().clone(),
            elements: Vec::new(),
            element_names: IndexMap::new(),
            attributes: Vec::new(),
            attribute_names: IndexMap::new(),
            attribute_groups: Vec::new(),
            attribute_group_names: IndexMap::new(),
            model_groups: Vec::new(),
            model_group_names: IndexMap::new(),
            identities: Vec::new(),
            identity_names: IndexMap::new(),
            notations: Vec::new(),
            notation_names: IndexMap::new(),
            qualified_elements: false,
            qualified_attributes: false,
            pending_attribute_groups: HashMap::new(),
            building_attribute_groups: HashSet::new(),
            schema_type_names: HashSet::new(),
            unresolved: Vec::new(),
            limits,
        }
    }

    /// Build and resolve the components of a parsed schema document
    pub fn from_document(document: &Document) -> Result<Self> {
        Self::from_document_with_limits(document, Limits::default())
    }

    /// Build from a parsed document with custom limits
    pub fn from_document_with_limits(document: &Document, limits: Limits) -> Result<Self> {
        let root = document
            .root()
            .ok_or_else(|| Error::structure("schema document has no root element"))?;
        let mut schema = Self::with_limits(limits);
        schema.build(root)?;
        Ok(schema)
    }

    /// Build from schema text
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::from_string_with_limits(xml, Limits::default())
    }

    /// Build from schema text with custom limits
    pub fn from_string_with_limits(xml: &str, limits: Limits) -> Result<Self> {
        let document = Document::parse_with_limits(xml.as_bytes(), &limits)?;
        Self::from_document_with_limits(&document, limits)
    }

    /// Build from a schema file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read(path.as_ref())?;
        let limits = Limits::default();
        let document = Document::parse_with_limits(&content, &limits)?;
        Self::from_document_with_limits(&document, limits)
    }

    /// Processing limits of the session
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    // =========================================================================
    // Registration and resolution
    // =========================================================================

    /// Add a type definition to the arena without naming it
    pub(crate) fn add_type(&mut self, definition: TypeDefinition) -> Result<TypeId> {
        self.limits.check_type_definitions(self.types.len() + 1)?;
        Ok(self.types.push(definition))
    }

    /// Register a named type definition and queue it for resolution
    ///
    /// A name already taken by a built-in of the same kind makes the
    /// built-in absorb the definition's content; the new definition is
    /// dropped and the built-in keeps its handle and codec. The handle
    /// that ends up holding the content is the one queued.
    pub fn register(&mut self, definition: TypeDefinition) -> Result<Registration> {
        let registration = self.insert_definition(definition)?;
        self.enqueue(registration.id());
        Ok(registration)
    }

    fn insert_definition(&mut self, definition: TypeDefinition) -> Result<Registration> {
        let name = match definition.name() {
            Some(name) => name.to_string(),
            None => return Ok(Registration::Inserted(self.add_type(definition)?)),
        };
        if !self.schema_type_names.insert(name.clone()) {
            return Err(Error::structure(format!(
                "type definition {} is declared more than once",
                name
            )));
        }

        let existing = match self.types.lookup(&name) {
            None => {
                let id = self.add_type(definition)?;
                self.types.names.insert(name, id);
                return Ok(Registration::Inserted(id));
            }
            Some(id) => id,
        };

        match (&mut self.types.types[existing.0], definition) {
            (TypeDefinition::Simple(builtin), TypeDefinition::Simple(st)) => builtin.absorb(st),
            (TypeDefinition::Complex(builtin), TypeDefinition::Complex(ct)) => builtin.absorb(ct),
            _ => {
                return Err(Error::structure(format!(
                    "name {} used for both simple and complex types",
                    name
                )))
            }
        }
        debug!("built-in type {} absorbed the schema definition", name);
        Ok(Registration::Absorbed(existing))
    }

    /// Queue a type definition for resolution
    pub fn enqueue(&mut self, id: TypeId) {
        self.unresolved.push(id);
    }

    /// Handles still waiting for resolution
    pub fn pending(&self) -> &[TypeId] {
        &self.unresolved
    }

    /// Resolve queued type definitions until none is left
    ///
    /// Each pass resolves the queue in order; definitions that depend on
    /// something still unresolved go back on the queue. A pass that leaves
    /// the queue unchanged means the remaining definitions can never be
    /// resolved.
    pub fn resolve_all(&mut self) -> Result<()> {
        let mut pass = 0;
        while !self.unresolved.is_empty() {
            pass += 1;
            if pass > self.limits.max_resolution_passes {
                return Err(Error::Unresolvable(self.pending_names()));
            }

            let snapshot = std::mem::take(&mut self.unresolved);
            debug!(pass, pending = snapshot.len(), "resolution pass");
            for &id in &snapshot {
                if self.resolve_type(id)? == Resolution::Deferred {
                    self.enqueue(id);
                }
            }

            if self.unresolved == snapshot {
                return Err(Error::Unresolvable(self.pending_names()));
            }
        }
        Ok(())
    }

    fn pending_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for id in &self.unresolved {
            if let Some(definition) = self.types.get(*id) {
                let name = definition.display_name();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    // =========================================================================
    // Type queries
    // =========================================================================

    /// Registered type definition by local name
    ///
    /// Never resolves anything; the definition may still be unresolved.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.types.lookup(name)
    }

    /// Registered simple type by local name
    pub fn lookup_simple(&self, name: &str) -> Option<&SimpleTypeDefinition> {
        self.lookup(name).and_then(|id| self.simple_type(id))
    }

    /// Registered complex type by local name
    pub fn lookup_complex(&self, name: &str) -> Option<&ComplexTypeDefinition> {
        self.lookup(name).and_then(|id| self.complex_type(id))
    }

    /// Type definition by handle
    pub fn type_definition(&self, id: TypeId) -> Option<&TypeDefinition> {
        self.types.get(id)
    }

    /// Simple type definition by handle
    pub fn simple_type(&self, id: TypeId) -> Option<&SimpleTypeDefinition> {
        self.types.get(id).and_then(|t| t.as_simple())
    }

    /// Complex type definition by handle
    pub fn complex_type(&self, id: TypeId) -> Option<&ComplexTypeDefinition> {
        self.types.get(id).and_then(|t| t.as_complex())
    }

    /// Registered type names with their handles, built-ins first
    pub fn type_names(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.types.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Names of the types the schema document declares
    pub fn schema_type_names(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.type_names()
            .filter(move |(name, _)| self.schema_type_names.contains(*name))
    }

    /// `{namespace}local` name of a type definition
    pub fn qualified_name(&self, id: TypeId) -> Option<String> {
        self.types.get(id).and_then(|t| t.qualified_name())
    }

    /// Number of type definitions, anonymous ones included
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub(crate) fn is_type_resolved(&self, id: TypeId) -> bool {
        self.types.get(id).is_some_and(|t| t.is_resolved())
    }

    pub(crate) fn type_display_name(&self, id: TypeId) -> String {
        self.types
            .get(id)
            .map(|t| t.display_name())
            .unwrap_or_else(|| format!("<type {}>", id.index()))
    }

    // =========================================================================
    // Declaration queries
    // =========================================================================

    /// Global attribute declaration by local name
    pub fn attribute_declaration(&self, name: &str) -> Option<&AttributeDeclaration> {
        self.attribute_names
            .get(name)
            .and_then(|id| self.attributes.get(id.0))
    }

    /// Attribute declaration by handle
    pub fn attribute(&self, id: AttributeDeclId) -> Option<&AttributeDeclaration> {
        self.attributes.get(id.0)
    }

    /// Global element declaration by local name
    pub fn element_declaration(&self, name: &str) -> Option<&ElementDeclaration> {
        self.element_names
            .get(name)
            .and_then(|id| self.elements.get(id.0))
    }

    /// Element declaration by handle
    pub fn element(&self, id: ElementDeclId) -> Option<&ElementDeclaration> {
        self.elements.get(id.0)
    }

    /// Names of the global element declarations
    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.element_names.keys().map(String::as_str)
    }

    /// Model group definition by local name
    pub fn model_group_definition(&self, name: &str) -> Option<&ModelGroupDefinition> {
        self.model_group_names
            .get(name)
            .and_then(|id| self.model_groups.get(id.0))
    }

    /// Model group definition by handle
    pub fn model_group(&self, id: ModelGroupDefId) -> Option<&ModelGroupDefinition> {
        self.model_groups.get(id.0)
    }

    /// Attribute group definition by local name
    pub fn attribute_group_definition(&self, name: &str) -> Option<&AttributeGroupDefinition> {
        self.attribute_group_names
            .get(name)
            .and_then(|id| self.attribute_groups.get(id.0))
    }

    /// Notation declaration by local name
    pub fn notation(&self, name: &str) -> Option<&NotationDeclaration> {
        self.notation_names
            .get(name)
            .and_then(|id| self.notations.get(id.0))
    }

    /// Identity-constraint definition by local name
    pub fn identity_constraint(&self, name: &str) -> Option<&IdentityConstraintDefinition> {
        self.identity_names
            .get(name)
            .and_then(|id| self.identities.get(id.0))
    }

    /// Identity-constraint definition by handle
    pub fn identity(&self, id: IdentityConstraintId) -> Option<&IdentityConstraintDefinition> {
        self.identities.get(id.0)
    }

    // =========================================================================
    // Built-in factories
    // =========================================================================

    /// Create a primitive type in this session
    pub fn create_primitive(&mut self, name: &str, codec: CodecRef) -> Result<TypeId> {
        self.limits.check_type_definitions(self.types.len() + 1)?;
        Ok(self.types.create_primitive(name, codec))
    }

    /// Create a derived atomic type in this session
    pub fn create_derived(&mut self, name: &str, parent: TypeId, codec: CodecRef) -> Result<TypeId> {
        self.limits.check_type_definitions(self.types.len() + 1)?;
        Ok(self.types.create_derived(name, parent, codec))
    }

    /// Create a list type in this session
    pub fn create_list(&mut self, name: &str, item_type: TypeId) -> Result<TypeId> {
        self.limits.check_type_definitions(self.types.len() + 1)?;
        Ok(self.types.create_list(name, item_type))
    }

    /// Union types cannot be created as built-ins
    pub fn create_union(&mut self, name: &str, member_types: &[TypeId]) -> Result<TypeId> {
        self.types.create_union(name, member_types)
    }

    // =========================================================================
    // Value conversion
    // =========================================================================

    /// Decode a lexical value with a simple type
    ///
    /// The type's own codec is used when bound; otherwise atomic types use
    /// their base type, lists decode each whitespace-separated item, and
    /// unions try their members in order.
    pub fn decode(&self, id: TypeId, text: &str) -> Result<XsdValue> {
        let st = self.value_type(id)?;
        if let Some(codec) = st.codec() {
            return codec.decode(text);
        }
        match &st.variety {
            Some(Variety::List { item_type }) => text
                .split_whitespace()
                .map(|item| self.decode(*item_type, item))
                .collect::<Result<Vec<_>>>()
                .map(XsdValue::List),
            Some(Variety::Union { member_types }) => member_types
                .iter()
                .find_map(|member| self.decode(*member, text).ok())
                .ok_or_else(|| {
                    Error::Value(format!(
                        "'{}' is not valid for any member of {}",
                        text,
                        st.display_name()
                    ))
                }),
            Some(Variety::Atomic { .. }) | Some(Variety::Absent) => self.decode(self.value_base(st)?, text),
            None => Err(Error::Value(format!("{} is not resolved", st.display_name()))),
        }
    }

    /// Encode a value with a simple type; the counterpart of [`Schema::decode`]
    pub fn encode(&self, id: TypeId, value: &XsdValue) -> Result<String> {
        let st = self.value_type(id)?;
        if let Some(codec) = st.codec() {
            return codec.encode(value);
        }
        match (&st.variety, value) {
            (Some(Variety::List { item_type }), XsdValue::List(items)) => {
                let encoded = items
                    .iter()
                    .map(|item| self.encode(*item_type, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(encoded.join(" "))
            }
            (Some(Variety::List { .. }), other) => Err(Error::Value(format!(
                "{} expects a list value, got {}",
                st.display_name(),
                other
            ))),
            (Some(Variety::Union { member_types }), _) => member_types
                .iter()
                .find_map(|member| self.encode(*member, value).ok())
                .ok_or_else(|| {
                    Error::Value(format!(
                        "{} is not valid for any member of {}",
                        value,
                        st.display_name()
                    ))
                }),
            (Some(Variety::Atomic { .. }), _) | (Some(Variety::Absent), _) => {
                self.encode(self.value_base(st)?, value)
            }
            (None, _) => Err(Error::Value(format!("{} is not resolved", st.display_name()))),
        }
    }

    fn value_type(&self, id: TypeId) -> Result<&SimpleTypeDefinition> {
        self.simple_type(id).ok_or_else(|| {
            Error::Value(format!(
                "{} is not a simple type",
                self.type_display_name(id)
            ))
        })
    }

    fn value_base(&self, st: &SimpleTypeDefinition) -> Result<TypeId> {
        st.base_type
            .filter(|base| self.simple_type(*base).is_some())
            .ok_or_else(|| Error::Value(format!("{} has no simple base type", st.display_name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::base::{SIMPLE_UR_TYPE_ID, UR_TYPE_ID};
    use crate::documents::Document;
    use pretty_assertions::assert_eq;

    fn node(xml: &str) -> Element {
        Document::from_string(xml).unwrap().root.unwrap()
    }

    fn simple_node(name: &str, base: &str) -> Element {
        node(&format!(
            r#"<xs:simpleType xmlns:xs="http://www.w3.org/2001/XMLSchema" name="{}">
                <xs:restriction base="xs:{}"/>
            </xs:simpleType>"#,
            name, base
        ))
    }

    #[test]
    fn test_new_session_has_builtins() {
        let schema = Schema::new();
        assert_eq!(schema.lookup("anyType"), Some(UR_TYPE_ID));
        assert_eq!(schema.lookup("anySimpleType"), Some(SIMPLE_UR_TYPE_ID));
        assert!(schema.lookup_simple("token").is_some());
        assert!(schema.lookup_complex("token").is_none());
        assert!(schema.lookup("Grade").is_none());
        assert!(schema.pending().is_empty());
    }

    #[test]
    fn test_register_new_name() {
        let mut schema = Schema::new();
        let st = SimpleTypeDefinition::unresolved(Some("Grade"), None, simple_node("Grade", "string"));
        let registration = schema.register(TypeDefinition::Simple(st)).unwrap();
        assert!(matches!(registration, Registration::Inserted(_)));
        assert_eq!(schema.lookup("Grade"), Some(registration.id()));
        assert!(!schema.is_type_resolved(registration.id()));
        assert_eq!(schema.pending(), &[registration.id()]);
    }

    #[test]
    fn test_register_builtin_name_is_absorbed() {
        let mut schema = Schema::new();
        let before = schema.lookup("token").unwrap();
        let st = SimpleTypeDefinition::unresolved(Some("token"), None, simple_node("token", "string"));
        let registration = schema.register(TypeDefinition::Simple(st)).unwrap();
        assert_eq!(registration, Registration::Absorbed(before));
        let token = schema.simple_type(before).unwrap();
        assert!(token.is_builtin());
        assert!(!token.is_resolved());
        assert!(token.codec().is_some());
        assert_eq!(schema.pending(), &[before]);
    }

    #[test]
    fn test_absorbed_builtin_resolves_without_manual_enqueue() {
        let mut schema = Schema::new();
        let token = schema.lookup("token").unwrap();
        let st = SimpleTypeDefinition::unresolved(
            Some("token"),
            None,
            simple_node("token", "normalizedString"),
        );
        schema.register(TypeDefinition::Simple(st)).unwrap();
        schema.resolve_all().unwrap();

        let resolved = schema.simple_type(token).unwrap();
        assert!(resolved.is_resolved());
        assert_eq!(resolved.base_type, schema.lookup("normalizedString"));
        assert!(schema.pending().is_empty());
    }

    #[test]
    fn test_register_kind_mismatch() {
        let mut schema = Schema::new();
        let ct = ComplexTypeDefinition::unresolved(
            Some("string"),
            None,
            node(r#"<complexType name="string"/>"#),
        );
        let err = schema.register(TypeDefinition::Complex(ct)).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("both simple and complex"));
    }

    #[test]
    fn test_register_duplicate_schema_name() {
        let mut schema = Schema::new();
        let first = SimpleTypeDefinition::unresolved(Some("Code"), None, simple_node("Code", "token"));
        schema.register(TypeDefinition::Simple(first)).unwrap();
        let count = schema.type_count();

        let second = SimpleTypeDefinition::unresolved(Some("Code"), None, simple_node("Code", "token"));
        let err = schema.register(TypeDefinition::Simple(second)).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(schema.type_count(), count);
        assert_eq!(schema.pending().len(), 1);
    }

    #[test]
    fn test_type_limit() {
        let limits = Limits {
            max_type_definitions: builtin_types().len(),
            ..Limits::default()
        };
        let mut schema = Schema::with_limits(limits);
        let st = SimpleTypeDefinition::unresolved(Some("Grade"), None, simple_node("Grade", "string"));
        assert!(matches!(
            schema.register(TypeDefinition::Simple(st)),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_decode_builtin_and_list() {
        let schema = Schema::new();
        let int = schema.lookup("int").unwrap();
        assert_eq!(schema.decode(int, "42").unwrap(), XsdValue::Integer(42));
        assert!(schema.decode(int, "4.2").is_err());

        let tokens = schema.lookup("NMTOKENS").unwrap();
        let value = schema.decode(tokens, "a b  c").unwrap();
        assert_eq!(
            value,
            XsdValue::List(vec![
                XsdValue::String("a".into()),
                XsdValue::String("b".into()),
                XsdValue::String("c".into()),
            ])
        );
        assert_eq!(schema.encode(tokens, &value).unwrap(), "a b c");
    }

    #[test]
    fn test_decode_complex_type_fails() {
        let schema = Schema::new();
        assert!(matches!(schema.decode(UR_TYPE_ID, "x"), Err(Error::Value(_))));
    }

    #[test]
    fn test_create_union_unimplemented() {
        let mut schema = Schema::new();
        let string = schema.lookup("string").unwrap();
        assert!(matches!(
            schema.create_union("text", &[string]),
            Err(Error::Unimplemented(_))
        ));
    }
}
