//! Built-in type bootstrap
//!
//! The two ur-types are process-wide singletons created exactly once. The
//! rest of the XSD 1.0 datatype hierarchy is built on top of them into an
//! immutable template table; every schema session starts from a copy of it,
//! so a built-in's [`TypeId`] is the same in every session.

use crate::error::{Error, Result};
use crate::XSD_NAMESPACE;
use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use std::sync::Arc;

use super::base::{TypeDefinition, TypeId, SIMPLE_UR_TYPE_ID, UR_TYPE_ID};
use super::codecs::{AtomicCodec, CodecRef, IdentityCodec};
use super::complex_types::ComplexTypeDefinition;
use super::simple_types::{SimpleTypeDefinition, Variety};

// =============================================================================
// Type names
// =============================================================================

/// XSD anyType type name
pub const XSD_ANY_TYPE: &str = "anyType";
/// XSD anySimpleType type name
pub const XSD_ANY_SIMPLE_TYPE: &str = "anySimpleType";
/// XSD string type name
pub const XSD_STRING: &str = "string";
/// XSD boolean type name
pub const XSD_BOOLEAN: &str = "boolean";
/// XSD decimal type name
pub const XSD_DECIMAL: &str = "decimal";
/// XSD integer type name
pub const XSD_INTEGER: &str = "integer";
/// XSD IDREFS type name
pub const XSD_IDREFS: &str = "IDREFS";
/// XSD ENTITIES type name
pub const XSD_ENTITIES: &str = "ENTITIES";
/// XSD NMTOKENS type name
pub const XSD_NMTOKENS: &str = "NMTOKENS";

/// The 19 primitive datatypes
pub const PRIMITIVE_TYPES: &[&str] = &[
    XSD_STRING,
    XSD_BOOLEAN,
    XSD_DECIMAL,
    "float",
    "double",
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "QName",
    "NOTATION",
];

/// Derived atomic datatypes with their parents, parents first
pub const DERIVED_TYPES: &[(&str, &str)] = &[
    ("normalizedString", XSD_STRING),
    ("token", "normalizedString"),
    ("language", "token"),
    ("Name", "token"),
    ("NCName", "Name"),
    ("ID", "NCName"),
    ("IDREF", "NCName"),
    ("ENTITY", "NCName"),
    ("NMTOKEN", "token"),
    (XSD_INTEGER, XSD_DECIMAL),
    ("nonPositiveInteger", XSD_INTEGER),
    ("negativeInteger", "nonPositiveInteger"),
    ("long", XSD_INTEGER),
    ("int", "long"),
    ("short", "int"),
    ("byte", "short"),
    ("nonNegativeInteger", XSD_INTEGER),
    ("unsignedLong", "nonNegativeInteger"),
    ("unsignedInt", "unsignedLong"),
    ("unsignedShort", "unsignedInt"),
    ("unsignedByte", "unsignedShort"),
    ("positiveInteger", "nonNegativeInteger"),
];

/// Built-in list datatypes with their item types
pub const LIST_TYPES: &[(&str, &str)] = &[
    (XSD_IDREFS, "IDREF"),
    (XSD_ENTITIES, "ENTITY"),
    (XSD_NMTOKENS, "NMTOKEN"),
];

// =============================================================================
// Ur-type singletons
// =============================================================================

static COMPLEX_UR_TYPE: OnceCell<ComplexTypeDefinition> = OnceCell::new();
static SIMPLE_UR_TYPE: OnceCell<SimpleTypeDefinition> = OnceCell::new();

/// The complex ur-type singleton
///
/// The first call must pass the namespace the ur-type lives in; later calls
/// pass `None` and get the same instance. Calling without a namespace
/// before any initialization bootstraps the standard XSD namespace.
///
/// # Panics
///
/// Passing a namespace once the ur-type exists is a programming error.
pub fn complex_ur_type(namespace: Option<&str>) -> &'static ComplexTypeDefinition {
    match namespace {
        Some(ns) => {
            let mut created = false;
            let ur = COMPLEX_UR_TYPE.get_or_init(|| {
                created = true;
                ComplexTypeDefinition::ur_type(ns)
            });
            assert!(created, "complex ur-type is already initialized");
            ur
        }
        None => Lazy::force(&BUILTINS).complex_ur_type(),
    }
}

/// The simple ur-type singleton; same contract as [`complex_ur_type`]
///
/// # Panics
///
/// Passing a namespace once the simple ur-type exists is a programming error,
/// and so is passing one other than the complex ur-type's namespace.
pub fn simple_ur_type(namespace: Option<&str>) -> &'static SimpleTypeDefinition {
    match namespace {
        Some(ns) => {
            let complex = COMPLEX_UR_TYPE.get_or_init(|| ComplexTypeDefinition::ur_type(ns));
            assert_eq!(
                complex.namespace.as_deref(),
                Some(ns),
                "simple ur-type namespace must match the complex ur-type"
            );
            let mut created = false;
            let ur = SIMPLE_UR_TYPE.get_or_init(|| {
                created = true;
                SimpleTypeDefinition::ur_type(ns, Arc::new(IdentityCodec))
            });
            assert!(created, "simple ur-type is already initialized");
            ur
        }
        None => Lazy::force(&BUILTINS).simple_ur_type(),
    }
}

// =============================================================================
// Type table
// =============================================================================

/// Arena of type definitions with the name index of the registered ones
#[derive(Debug, Clone)]
pub struct TypeTable {
    pub(crate) types: Vec<TypeDefinition>,
    pub(crate) names: IndexMap<String, TypeId>,
}

impl TypeTable {
    /// A table holding only the two ur-types
    fn with_ur_types() -> Self {
        let complex = COMPLEX_UR_TYPE.get_or_init(|| ComplexTypeDefinition::ur_type(XSD_NAMESPACE));
        let namespace = complex.namespace.as_deref().unwrap_or(XSD_NAMESPACE);
        let simple = SIMPLE_UR_TYPE
            .get_or_init(|| SimpleTypeDefinition::ur_type(namespace, Arc::new(IdentityCodec)));

        let mut names = IndexMap::new();
        names.insert(XSD_ANY_TYPE.to_string(), UR_TYPE_ID);
        names.insert(XSD_ANY_SIMPLE_TYPE.to_string(), SIMPLE_UR_TYPE_ID);
        Self {
            types: vec![
                TypeDefinition::Complex(complex.clone()),
                TypeDefinition::Simple(simple.clone()),
            ],
            names,
        }
    }

    /// Number of type definitions
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check for an empty table
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Namespace of the built-in hierarchy
    pub fn builtin_namespace(&self) -> &str {
        self.types
            .get(UR_TYPE_ID.0)
            .and_then(|t| t.as_complex())
            .and_then(|ct| ct.namespace.as_deref())
            .unwrap_or(XSD_NAMESPACE)
    }

    /// Get a definition by handle
    pub fn get(&self, id: TypeId) -> Option<&TypeDefinition> {
        self.types.get(id.0)
    }

    /// Registered definition by local name
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub(crate) fn push(&mut self, definition: TypeDefinition) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(definition);
        id
    }

    fn push_named(&mut self, name: &str, definition: TypeDefinition) -> TypeId {
        assert!(
            !self.names.contains_key(name),
            "built-in type {} is already defined",
            name
        );
        let id = self.push(definition);
        self.names.insert(name.to_string(), id);
        id
    }

    fn simple(&self, id: TypeId) -> Option<&SimpleTypeDefinition> {
        self.get(id).and_then(|t| t.as_simple())
    }

    /// Create a primitive built-in bound to `codec`
    pub fn create_primitive(&mut self, name: &str, codec: CodecRef) -> TypeId {
        let id = TypeId(self.types.len());
        let namespace = self.builtin_namespace().to_string();
        let st = SimpleTypeDefinition::primitive(name, &namespace, id, codec);
        self.push_named(name, TypeDefinition::Simple(st))
    }

    /// Create a derived built-in restricting `parent`
    ///
    /// # Panics
    ///
    /// The parent must be a resolved simple type of absent or atomic variety.
    pub fn create_derived(&mut self, name: &str, parent: TypeId, codec: CodecRef) -> TypeId {
        let variety = match self.simple(parent).and_then(|st| st.variety.clone()) {
            Some(Variety::Absent) => Variety::Absent,
            Some(Variety::Atomic { primitive }) => Variety::Atomic { primitive },
            other => panic!(
                "built-in {} must derive from an absent or atomic simple type, not {:?}",
                name, other
            ),
        };
        let namespace = self.builtin_namespace().to_string();
        let st = SimpleTypeDefinition::derived(name, &namespace, parent, variety, codec);
        self.push_named(name, TypeDefinition::Simple(st))
    }

    /// Create a list built-in over `item_type`
    pub fn create_list(&mut self, name: &str, item_type: TypeId) -> TypeId {
        let namespace = self.builtin_namespace().to_string();
        let st = SimpleTypeDefinition::list(name, &namespace, item_type);
        self.push_named(name, TypeDefinition::Simple(st))
    }

    /// Union built-ins are not supported
    pub fn create_union(&mut self, name: &str, _member_types: &[TypeId]) -> Result<TypeId> {
        Err(Error::Unimplemented(format!(
            "union built-in type {}",
            name
        )))
    }

    fn complex_ur_type(&self) -> &ComplexTypeDefinition {
        match self.types.first() {
            Some(TypeDefinition::Complex(ct)) => ct,
            _ => unreachable!("type tables always start with the complex ur-type"),
        }
    }

    fn simple_ur_type(&self) -> &SimpleTypeDefinition {
        match self.types.get(SIMPLE_UR_TYPE_ID.0) {
            Some(TypeDefinition::Simple(st)) => st,
            _ => unreachable!("type tables always hold the simple ur-type second"),
        }
    }
}

fn builtin_codec(name: &str) -> CodecRef {
    match AtomicCodec::for_builtin(name) {
        Some(codec) => Arc::new(codec),
        None => unreachable!("no codec for built-in {}", name),
    }
}

/// Build the standard datatype hierarchy
fn bootstrap() -> TypeTable {
    let mut table = TypeTable::with_ur_types();

    for name in PRIMITIVE_TYPES {
        table.create_primitive(name, builtin_codec(name));
    }
    for (name, parent) in DERIVED_TYPES {
        let parent = table.names[*parent];
        table.create_derived(name, parent, builtin_codec(name));
    }
    for (name, item) in LIST_TYPES {
        let item = table.names[*item];
        table.create_list(name, item);
    }

    tracing::debug!(count = table.len(), "bootstrapped built-in type definitions");
    table
}

static BUILTINS: Lazy<TypeTable> = Lazy::new(bootstrap);

/// The process-wide built-in template table
///
/// The singletons it holds are the same ones [`complex_ur_type`] and
/// [`simple_ur_type`] return.
pub fn builtin_types() -> &'static TypeTable {
    &BUILTINS
}
