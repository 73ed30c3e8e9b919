//! # xmlschema-structures
//!
//! The component model of XML Schema 1.0: a registry of simple and complex
//! type definitions, declarations and groups built from a schema document,
//! with every cross-reference resolved.
//!
//! ## Features
//!
//! - Built-in datatype hierarchy bootstrapped from the two ur-types
//! - Two-phase construction: components are built first, references are
//!   resolved afterwards, so definitions may appear in any order
//! - Fixpoint resolution that reports reference cycles instead of looping
//! - Schema documents may redeclare built-in types; the built-in keeps its
//!   identity and codec
//! - Lexical value conversion through per-datatype codecs
//!
//! ## Example
//!
//! ```rust
//! use xmlschema_structures::{Schema, Variety};
//!
//! let schema = Schema::from_string(r#"
//!     <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!         <xs:simpleType name="Grades">
//!             <xs:list itemType="Grade"/>
//!         </xs:simpleType>
//!         <xs:simpleType name="Grade">
//!             <xs:restriction base="xs:string"/>
//!         </xs:simpleType>
//!     </xs:schema>
//! "#)?;
//!
//! let grades = schema.lookup_simple("Grades").unwrap();
//! assert_eq!(
//!     grades.variety,
//!     Some(Variety::List { item_type: schema.lookup("Grade").unwrap() })
//! );
//! # Ok::<(), xmlschema_structures::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and documents
pub mod documents;
pub mod names;
pub mod namespaces;

// Schema components
pub mod components;

// Re-exports for convenience
pub use components::{
    complex_ur_type, simple_ur_type, ComplexTypeDefinition, Component, ContentType,
    DerivationMethod, Registration, Resolution, Schema, SimpleTypeDefinition, TypeDefinition,
    TypeId, Variety, XsdValue,
};
pub use documents::{Document, Element};
pub use error::{Error, ParseError, Result};
pub use limits::Limits;

/// Version of the xmlschema-structures library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
