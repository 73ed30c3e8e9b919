//! Model groups and model group definitions
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#Model_Groups

use std::fmt;

use super::annotations::Annotation;
use super::base::Component;
use super::particles::{Particle, Term};

/// Compositor of a model group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compositor {
    /// Ordered sequence of particles
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of particles (XSD 1.0: elements only)
    All,
}

impl Compositor {
    /// Parse from element local name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequence" => Some(Self::Sequence),
            "choice" => Some(Self::Choice),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Schema keyword of the compositor
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Choice => "choice",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model group: a compositor over an ordered list of particles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelGroup {
    /// The compositor
    pub compositor: Compositor,
    /// Particles in document order
    pub particles: Vec<Particle>,
}

impl ModelGroup {
    /// Create a model group
    pub fn new(compositor: Compositor, particles: Vec<Particle>) -> Self {
        Self {
            compositor,
            particles,
        }
    }

    /// An empty sequence
    pub fn empty_sequence() -> Self {
        Self::new(Compositor::Sequence, Vec::new())
    }

    /// Check for no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Nested inline model groups, depth first
    pub fn iter_groups(&self) -> Vec<&ModelGroup> {
        let mut groups = vec![self];
        for particle in &self.particles {
            if let Term::ModelGroup(group) = &particle.term {
                groups.extend(group.iter_groups());
            }
        }
        groups
    }
}

/// Named, top-level model group (`group name="..."`)
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroupDefinition {
    /// Group name
    pub name: String,
    /// Target namespace
    pub namespace: Option<String>,
    /// The group's single model group
    pub model_group: ModelGroup,
    /// Annotation
    pub annotation: Option<Annotation>,
}

impl ModelGroupDefinition {
    pub(crate) fn placeholder(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(String::from),
            model_group: ModelGroup::empty_sequence(),
            annotation: None,
        }
    }
}

impl Component for ModelGroupDefinition {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn target_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn kind(&self) -> &'static str {
        "group"
    }
}
