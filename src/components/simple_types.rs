//! Simple type definitions
//!
//! A simple type is created either resolved (built-ins) or unresolved, with
//! only its name, namespace and pending schema node set. Resolution fills in
//! the variety; once set, it never changes.
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#Simple_Type_Definitions

use crate::documents::Element;
use std::fmt;
use std::sync::Arc;

use super::annotations::Annotation;
use super::base::{Component, DerivationSet, TypeId, SIMPLE_UR_TYPE_ID, UR_TYPE_ID};
use super::codecs::CodecRef;
use super::facets::Facets;

/// Variety of a simple type, carrying only the fields valid for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variety {
    /// The simple ur-type only
    Absent,
    /// Scalar values of a primitive type
    Atomic {
        /// The primitive type the variety descends from
        primitive: TypeId,
    },
    /// Whitespace-separated sequences of item type values
    List {
        /// Item type
        item_type: TypeId,
    },
    /// Values of one of several member types
    Union {
        /// Member types, in order
        member_types: Vec<TypeId>,
    },
}

impl Variety {
    /// Variety keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Variety::Absent => "absent",
            Variety::Atomic { .. } => "atomic",
            Variety::List { .. } => "list",
            Variety::Union { .. } => "union",
        }
    }
}

impl fmt::Display for Variety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simple type definition component
#[derive(Clone)]
pub struct SimpleTypeDefinition {
    /// Local name, `None` when anonymous
    pub name: Option<String>,
    /// Target namespace
    pub namespace: Option<String>,
    /// Base type; set once resolution knows it
    pub base_type: Option<TypeId>,
    /// Variety; `None` while unresolved
    pub variety: Option<Variety>,
    /// Derivations disallowed by `final`
    pub final_set: DerivationSet,
    /// Facets of the defining restriction
    pub facets: Facets,
    /// Annotation of the defining element
    pub annotation: Option<Annotation>,
    /// Schema element still to be resolved
    pub(crate) node: Option<Element>,
    /// Anonymous type built while resolving, reused on retries
    pub(crate) anonymous_dependency: Option<TypeId>,
    builtin: bool,
    primitive: bool,
    codec: Option<CodecRef>,
}

impl fmt::Debug for SimpleTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleTypeDefinition")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("base_type", &self.base_type)
            .field("variety", &self.variety)
            .field("builtin", &self.builtin)
            .field("codec", &self.codec.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl SimpleTypeDefinition {
    /// Create an unresolved definition bound to its schema element
    pub fn unresolved(name: Option<&str>, namespace: Option<&str>, node: Element) -> Self {
        Self {
            name: name.map(String::from),
            namespace: namespace.map(String::from),
            base_type: None,
            variety: None,
            final_set: DerivationSet::default(),
            facets: Facets::new(),
            annotation: Annotation::of(&node),
            node: Some(node),
            anonymous_dependency: None,
            builtin: false,
            primitive: false,
            codec: None,
        }
    }

    /// The simple ur-type: variety absent, base the complex ur-type
    pub(crate) fn ur_type(namespace: &str, codec: CodecRef) -> Self {
        let mut st = Self::resolved("anySimpleType", namespace, UR_TYPE_ID, Variety::Absent);
        st.codec = Some(codec);
        st
    }

    /// A primitive built-in: atomic, its own primitive, base the simple ur-type
    pub(crate) fn primitive(name: &str, namespace: &str, id: TypeId, codec: CodecRef) -> Self {
        let mut st = Self::resolved(
            name,
            namespace,
            SIMPLE_UR_TYPE_ID,
            Variety::Atomic { primitive: id },
        );
        st.primitive = true;
        st.codec = Some(codec);
        st
    }

    /// A derived built-in inheriting the parent's variety
    pub(crate) fn derived(name: &str, namespace: &str, parent: TypeId, variety: Variety, codec: CodecRef) -> Self {
        let mut st = Self::resolved(name, namespace, parent, variety);
        st.codec = Some(codec);
        st
    }

    /// A list built-in over `item_type`; lists have no codec of their own
    pub(crate) fn list(name: &str, namespace: &str, item_type: TypeId) -> Self {
        Self::resolved(name, namespace, SIMPLE_UR_TYPE_ID, Variety::List { item_type })
    }

    fn resolved(name: &str, namespace: &str, base_type: TypeId, variety: Variety) -> Self {
        Self {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            base_type: Some(base_type),
            variety: Some(variety),
            final_set: DerivationSet::default(),
            facets: Facets::new(),
            annotation: None,
            node: None,
            anonymous_dependency: None,
            builtin: true,
            primitive: false,
            codec: None,
        }
    }

    /// Anonymous, already resolved restriction of `base` carrying `facets`
    pub(crate) fn anonymous_restriction(
        namespace: Option<&str>,
        base: TypeId,
        variety: Variety,
        facets: Facets,
    ) -> Self {
        Self {
            name: None,
            namespace: namespace.map(String::from),
            base_type: Some(base),
            variety: Some(variety),
            final_set: DerivationSet::default(),
            facets,
            annotation: None,
            node: None,
            anonymous_dependency: None,
            builtin: false,
            primitive: false,
            codec: None,
        }
    }

    /// Bind the codec used for lexical conversion
    ///
    /// # Panics
    ///
    /// Binding a second codec is a programming error.
    pub fn bind_codec(&mut self, codec: CodecRef) {
        assert!(
            self.codec.is_none(),
            "codec already bound to simple type {}",
            self.display_name()
        );
        self.codec = Some(codec);
    }

    /// The bound codec, if any
    pub fn codec(&self) -> Option<&CodecRef> {
        self.codec.as_ref()
    }

    /// Check whether `other` is the same codec instance as the one bound here
    pub fn shares_codec(&self, other: &CodecRef) -> bool {
        self.codec.as_ref().is_some_and(|c| Arc::ptr_eq(c, other))
    }

    /// Whether the definition is part of the built-in hierarchy
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Whether the definition is a built-in primitive datatype
    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    /// Primitive type of an atomic definition
    pub fn primitive_type(&self) -> Option<TypeId> {
        match self.variety {
            Some(Variety::Atomic { primitive }) => Some(primitive),
            _ => None,
        }
    }

    /// Item type of a list definition
    pub fn item_type(&self) -> Option<TypeId> {
        match self.variety {
            Some(Variety::List { item_type }) => Some(item_type),
            _ => None,
        }
    }

    /// Member types of a union definition
    pub fn member_types(&self) -> Option<&[TypeId]> {
        match &self.variety {
            Some(Variety::Union { member_types }) => Some(member_types),
            _ => None,
        }
    }

    /// Take over the schema element of a same-named schema definition
    ///
    /// The definition returns to the unresolved state so it is resolved
    /// again from the schema's own content; identity and codec are kept.
    pub(crate) fn absorb(&mut self, other: SimpleTypeDefinition) {
        self.node = other.node;
        self.annotation = other.annotation;
        self.final_set = other.final_set;
        self.variety = None;
        self.anonymous_dependency = None;
    }

    /// Mark resolved with the given base and variety
    pub(crate) fn complete(&mut self, base_type: TypeId, variety: Variety) {
        self.base_type = Some(base_type);
        self.variety = Some(variety);
        self.node = None;
    }
}

impl Component for SimpleTypeDefinition {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn is_resolved(&self) -> bool {
        self.variety.is_some()
    }

    fn kind(&self) -> &'static str {
        "simpleType"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::codecs::{AtomicCodec, IdentityCodec};
    use crate::documents::Document;

    const XS: &str = "http://www.w3.org/2001/XMLSchema";

    #[test]
    fn test_primitive_is_own_primitive() {
        let codec: CodecRef = Arc::new(AtomicCodec::for_builtin("string").unwrap());
        let st = SimpleTypeDefinition::primitive("string", XS, TypeId(2), codec.clone());
        assert_eq!(st.primitive_type(), Some(TypeId(2)));
        assert_eq!(st.base_type, Some(SIMPLE_UR_TYPE_ID));
        assert!(st.is_builtin() && st.is_primitive() && st.is_resolved());
        assert!(st.shares_codec(&codec));
    }

    #[test]
    fn test_unresolved_definition() {
        let doc = Document::from_string(
            r#"<xs:simpleType xmlns:xs="http://www.w3.org/2001/XMLSchema" name="Grade"><xs:restriction base="xs:string"/></xs:simpleType>"#,
        )
        .unwrap();
        let st = SimpleTypeDefinition::unresolved(Some("Grade"), None, doc.root.unwrap());
        assert!(!st.is_resolved());
        assert!(st.node.is_some());
        assert_eq!(st.qualified_name().as_deref(), Some("Grade"));
        assert_eq!(st.kind(), "simpleType");
    }

    #[test]
    fn test_absorb_keeps_codec_and_clears_variety() {
        let codec: CodecRef = Arc::new(IdentityCodec);
        let mut ur = SimpleTypeDefinition::ur_type(XS, codec.clone());
        let doc = Document::from_string("<simpleType name='anySimpleType'/>").unwrap();
        let schema_def = SimpleTypeDefinition::unresolved(Some("anySimpleType"), Some(XS), doc.root.unwrap());

        ur.absorb(schema_def);
        assert!(!ur.is_resolved());
        assert!(ur.node.is_some());
        assert!(ur.shares_codec(&codec));
        assert!(ur.is_builtin());
    }

    #[test]
    #[should_panic(expected = "codec already bound")]
    fn test_second_codec_binding_panics() {
        let mut st = SimpleTypeDefinition::list("IDREFS", XS, TypeId(5));
        st.bind_codec(Arc::new(IdentityCodec));
        st.bind_codec(Arc::new(IdentityCodec));
    }

    #[test]
    fn test_variety_accessors() {
        let list = SimpleTypeDefinition::list("NMTOKENS", XS, TypeId(7));
        assert_eq!(list.item_type(), Some(TypeId(7)));
        assert_eq!(list.primitive_type(), None);
        assert_eq!(list.variety.as_ref().map(|v| v.as_str()), Some("list"));
        assert!(list.codec().is_none());
    }
}
