//! Component foundations
//!
//! Handles into the per-schema arenas, the small value types shared by
//! several component kinds, and the [`Component`] trait every named schema
//! component implements.

use crate::namespaces::qualified_name;
use std::fmt;

use super::complex_types::ComplexTypeDefinition;
use super::simple_types::SimpleTypeDefinition;

// =============================================================================
// Handles
// =============================================================================

macro_rules! component_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position of the component in its arena
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

component_id!(
    /// Handle of a simple or complex type definition
    TypeId
);
component_id!(
    /// Handle of an element declaration
    ElementDeclId
);
component_id!(
    /// Handle of an attribute declaration
    AttributeDeclId
);
component_id!(
    /// Handle of an attribute group definition
    AttributeGroupId
);
component_id!(
    /// Handle of a model group definition
    ModelGroupDefId
);
component_id!(
    /// Handle of an identity-constraint definition
    IdentityConstraintId
);
component_id!(
    /// Handle of a notation declaration
    NotationId
);

/// The complex ur-type (`anyType`) in every schema arena
pub const UR_TYPE_ID: TypeId = TypeId(0);

/// The simple ur-type (`anySimpleType`) in every schema arena
pub const SIMPLE_UR_TYPE_ID: TypeId = TypeId(1);

// =============================================================================
// Component trait
// =============================================================================

/// Common accessors of schema components
pub trait Component: fmt::Debug {
    /// Local name, `None` for anonymous components
    fn name(&self) -> Option<&str>;

    /// Target namespace of the component
    fn target_namespace(&self) -> Option<&str>;

    /// Whether all references of the component have been resolved
    fn is_resolved(&self) -> bool {
        true
    }

    /// `{namespace}local` form of the name
    fn qualified_name(&self) -> Option<String> {
        self.name()
            .map(|name| qualified_name(self.target_namespace(), name))
    }

    /// Name for diagnostics; anonymous components use a placeholder
    fn display_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("<anonymous {}>", self.kind()),
        }
    }

    /// Schema element this component is built from, e.g. `simpleType`
    fn kind(&self) -> &'static str;
}

// =============================================================================
// Type definitions
// =============================================================================

/// A simple or complex type definition stored in the type arena
#[derive(Debug, Clone)]
pub enum TypeDefinition {
    /// Simple type definition
    Simple(SimpleTypeDefinition),
    /// Complex type definition
    Complex(ComplexTypeDefinition),
}

impl TypeDefinition {
    /// Borrow as a simple type definition
    pub fn as_simple(&self) -> Option<&SimpleTypeDefinition> {
        match self {
            TypeDefinition::Simple(st) => Some(st),
            TypeDefinition::Complex(_) => None,
        }
    }

    /// Borrow as a complex type definition
    pub fn as_complex(&self) -> Option<&ComplexTypeDefinition> {
        match self {
            TypeDefinition::Complex(ct) => Some(ct),
            TypeDefinition::Simple(_) => None,
        }
    }

    /// Check for a simple type definition
    pub fn is_simple(&self) -> bool {
        matches!(self, TypeDefinition::Simple(_))
    }

    /// Base type handle, once known
    pub fn base_type(&self) -> Option<TypeId> {
        match self {
            TypeDefinition::Simple(st) => st.base_type,
            TypeDefinition::Complex(ct) => ct.base_type,
        }
    }

    /// Whether the definition belongs to the built-in hierarchy
    pub fn is_builtin(&self) -> bool {
        match self {
            TypeDefinition::Simple(st) => st.is_builtin(),
            TypeDefinition::Complex(ct) => ct.is_builtin(),
        }
    }

    fn inner(&self) -> &dyn Component {
        match self {
            TypeDefinition::Simple(st) => st,
            TypeDefinition::Complex(ct) => ct,
        }
    }
}

impl Component for TypeDefinition {
    fn name(&self) -> Option<&str> {
        self.inner().name()
    }

    fn target_namespace(&self) -> Option<&str> {
        self.inner().target_namespace()
    }

    fn is_resolved(&self) -> bool {
        self.inner().is_resolved()
    }

    fn kind(&self) -> &'static str {
        self.inner().kind()
    }
}

// =============================================================================
// Shared value types
// =============================================================================

/// How a complex type relates to its base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivationMethod {
    /// Derived by adding content or attributes
    Extension,
    /// Derived by narrowing the base
    Restriction,
}

impl DerivationMethod {
    /// Schema keyword for the method
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivationMethod::Extension => "extension",
            DerivationMethod::Restriction => "restriction",
        }
    }
}

impl fmt::Display for DerivationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of derivation keywords from a `final`, `block` or `finalDefault` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationSet {
    /// `extension`
    pub extension: bool,
    /// `restriction`
    pub restriction: bool,
    /// `list`
    pub list: bool,
    /// `union`
    pub union: bool,
    /// `substitution`
    pub substitution: bool,
}

impl DerivationSet {
    /// Keywords accepted by simple type `final`
    pub const SIMPLE_FINAL: &'static [&'static str] = &["restriction", "list", "union"];
    /// Keywords accepted by complex type `final` and `block`, element `final`
    pub const COMPLEX: &'static [&'static str] = &["extension", "restriction"];
    /// Keywords accepted by element `block`
    pub const ELEMENT_BLOCK: &'static [&'static str] = &["extension", "restriction", "substitution"];

    /// Parse an attribute value, accepting only `allowed` keywords
    ///
    /// `#all` sets every allowed keyword. Returns the offending token on
    /// failure.
    pub fn parse(value: &str, allowed: &[&str]) -> std::result::Result<Self, String> {
        let mut set = DerivationSet::default();
        let value = value.trim();
        if value == "#all" {
            for keyword in allowed {
                set.insert(keyword);
            }
            return Ok(set);
        }
        for token in value.split_whitespace() {
            if !allowed.contains(&token) {
                return Err(token.to_string());
            }
            set.insert(token);
        }
        Ok(set)
    }

    fn insert(&mut self, keyword: &str) {
        match keyword {
            "extension" => self.extension = true,
            "restriction" => self.restriction = true,
            "list" => self.list = true,
            "union" => self.union = true,
            "substitution" => self.substitution = true,
            _ => {}
        }
    }

    /// Check whether `method` is in the set
    pub fn contains(&self, method: DerivationMethod) -> bool {
        match method {
            DerivationMethod::Extension => self.extension,
            DerivationMethod::Restriction => self.restriction,
        }
    }

    /// Check for the empty set
    pub fn is_empty(&self) -> bool {
        *self == DerivationSet::default()
    }
}

/// Declaration scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Top-level declaration
    Global,
    /// Declared inside a complex type, model group or attribute group
    Local,
}

/// Default or fixed value of an attribute or element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueConstraint {
    /// `default="..."`
    Default(String),
    /// `fixed="..."`
    Fixed(String),
}

impl ValueConstraint {
    /// The constraint's lexical value
    pub fn value(&self) -> &str {
        match self {
            ValueConstraint::Default(v) | ValueConstraint::Fixed(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_set_all() {
        let set = DerivationSet::parse("#all", DerivationSet::COMPLEX).unwrap();
        assert!(set.extension);
        assert!(set.restriction);
        assert!(!set.list);
        assert!(!set.substitution);
    }

    #[test]
    fn test_derivation_set_tokens() {
        let set = DerivationSet::parse(" list  union ", DerivationSet::SIMPLE_FINAL).unwrap();
        assert!(set.list && set.union);
        assert!(!set.restriction);
        assert!(DerivationSet::parse("", DerivationSet::COMPLEX).unwrap().is_empty());
    }

    #[test]
    fn test_derivation_set_rejects_keyword() {
        assert_eq!(
            DerivationSet::parse("extension", DerivationSet::SIMPLE_FINAL),
            Err("extension".to_string())
        );
    }

    #[test]
    fn test_value_constraint() {
        assert_eq!(ValueConstraint::Fixed("1".into()).value(), "1");
        assert_eq!(DerivationMethod::Extension.to_string(), "extension");
    }
}
