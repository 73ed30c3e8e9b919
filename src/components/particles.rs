//! Particle components
//!
//! A particle is an occurrence-constrained reference to a term: a model
//! group, a model group definition, an element declaration or a wildcard.
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#cParticles

use crate::documents::Element;
use crate::error::{Error, Result};
use std::fmt;

use super::base::{ElementDeclId, ModelGroupDefId};
use super::groups::ModelGroup;
use super::wildcards::Wildcard;

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create occurrence bounds, rejecting `max < min`
    pub fn new(min: u32, max: Option<u32>) -> Result<Self> {
        if let Some(max) = max {
            if max < min {
                return Err(Error::structure(format!(
                    "maxOccurs ({}) must not be less than minOccurs ({})",
                    max, min
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// Read `minOccurs` / `maxOccurs` from a particle element
    pub fn from_element(node: &Element) -> Result<Self> {
        let min = match node.get_attribute("minOccurs") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| {
                node.structure_error(format!("invalid minOccurs value '{}'", value))
            })?,
            None => 1,
        };
        let max = match node.get_attribute("maxOccurs").map(str::trim) {
            Some("unbounded") => None,
            Some(value) => Some(value.parse::<u32>().map_err(|_| {
                node.structure_error(format!("invalid maxOccurs value '{}'", value))
            })?),
            None => Some(1),
        };
        Occurs::new(min, max).map_err(|e| match e {
            Error::Structure(err) => Error::Structure(err.with_location(node.describe())),
            other => other,
        })
    }

    /// Check if this particle can be empty (minOccurs == 0)
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Check if this particle is empty (maxOccurs == 0)
    pub fn is_empty(&self) -> bool {
        self.max == Some(0)
    }

    /// Check if particle has maxOccurs == 1
    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}..{}]", self.min, max),
            None => write!(f, "[{}..*]", self.min),
        }
    }
}

/// The term a particle refers to
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Inline model group
    ModelGroup(ModelGroup),
    /// Reference to a named model group definition
    GroupDefinition(ModelGroupDefId),
    /// Element declaration (local or referenced top-level)
    Element(ElementDeclId),
    /// Element wildcard
    Wildcard(Wildcard),
}

/// Particle component
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Occurrence bounds
    pub occurs: Occurs,
    /// Referenced term
    pub term: Term,
}

impl Particle {
    /// Create a particle; fails when `max < min`
    pub fn new(term: Term, min_occurs: u32, max_occurs: Option<u32>) -> Result<Self> {
        Ok(Self {
            occurs: Occurs::new(min_occurs, max_occurs)?,
            term,
        })
    }

    /// Create a particle from already-checked bounds
    pub fn with_occurs(term: Term, occurs: Occurs) -> Self {
        Self { occurs, term }
    }

    /// minOccurs
    pub fn min_occurs(&self) -> u32 {
        self.occurs.min
    }

    /// maxOccurs, `None` when unbounded
    pub fn max_occurs(&self) -> Option<u32> {
        self.occurs.max
    }

    /// Inline model group term, if any
    pub fn model_group(&self) -> Option<&ModelGroup> {
        match &self.term {
            Term::ModelGroup(group) => Some(group),
            _ => None,
        }
    }
}
