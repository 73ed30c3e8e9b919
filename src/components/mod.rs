//! Schema components
//!
//! The component model of XML Schema 1.0:
//!
//! - Type definitions ([`SimpleTypeDefinition`], [`ComplexTypeDefinition`])
//! - Declarations (elements, attributes, notations)
//! - Groups (model groups, attribute groups) and particles
//! - Identity constraints, wildcards and annotations
//!
//! Components live in the arenas of a [`Schema`] and refer to each other
//! through copyable handles such as [`TypeId`], so self-referential and
//! mutually recursive definitions need no shared ownership.

pub mod annotations;
pub mod attributes;
pub mod base;
pub mod builtins;
pub mod codecs;
pub mod complex_types;
pub mod elements;
pub mod facets;
pub mod groups;
pub mod identities;
pub mod notations;
mod parsing;
pub mod particles;
mod resolver;
pub mod schemas;
pub mod simple_types;
pub mod wildcards;

pub use annotations::Annotation;
pub use attributes::{AttributeDeclaration, AttributeGroupDefinition, AttributeUse, AttributeUses};
pub use base::{
    AttributeDeclId, AttributeGroupId, Component, DerivationMethod, DerivationSet, ElementDeclId,
    IdentityConstraintId, ModelGroupDefId, NotationId, Scope, TypeDefinition, TypeId,
    ValueConstraint, SIMPLE_UR_TYPE_ID, UR_TYPE_ID,
};
pub use builtins::{builtin_types, complex_ur_type, simple_ur_type, TypeTable};
pub use codecs::{AtomicCodec, Codec, CodecRef, IdentityCodec, XsdValue};
pub use complex_types::{ComplexTypeDefinition, ContentType};
pub use elements::ElementDeclaration;
pub use facets::{Facet, Facets, WhiteSpace};
pub use groups::{Compositor, ModelGroup, ModelGroupDefinition};
pub use identities::{IdentityConstraintCategory, IdentityConstraintDefinition};
pub use notations::NotationDeclaration;
pub use particles::{Occurs, Particle, Term};
pub use schemas::{Registration, Resolution, Schema};
pub use simple_types::{SimpleTypeDefinition, Variety};
pub use wildcards::{NamespaceConstraint, ProcessContents, Wildcard};
