//! Wildcard components
//!
//! This module implements the wildcards behind `any` and `anyAttribute`,
//! including the union and intersection operations used to combine
//! attribute wildcards of complex types and attribute groups.
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#Wildcards

use crate::documents::Element;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Process contents mode for wildcards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessContents {
    /// Validate strictly - element/attribute must be declared
    #[default]
    Strict,
    /// Validate if declaration found, otherwise accept
    Lax,
    /// Skip validation entirely
    Skip,
}

impl ProcessContents {
    /// Parse from string value
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "strict" => Some(Self::Strict),
            "lax" => Some(Self::Lax),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for ProcessContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lax => write!(f, "lax"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Namespace constraint for wildcards
///
/// `None` stands for "no namespace" (absent).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceConstraint {
    /// Any namespace is allowed (`##any`)
    #[default]
    Any,
    /// Any namespace except the given one and absent (`##other`)
    Not(Option<String>),
    /// Exactly the listed namespaces
    Set(BTreeSet<Option<String>>),
}

impl NamespaceConstraint {
    /// Create from a `namespace` attribute value
    pub fn from_namespace_attr(value: &str, target_namespace: Option<&str>) -> Result<Self> {
        match value.trim() {
            "##any" => Ok(Self::Any),
            "##other" => Ok(Self::Not(target_namespace.map(String::from))),
            value => {
                let mut namespaces = BTreeSet::new();
                for ns in value.split_whitespace() {
                    match ns {
                        "##local" => {
                            namespaces.insert(None);
                        }
                        "##targetNamespace" => {
                            namespaces.insert(target_namespace.map(String::from));
                        }
                        s if s.starts_with("##") => {
                            return Err(Error::structure(format!(
                                "wrong value '{}' in 'namespace' attribute",
                                s
                            )));
                        }
                        uri => {
                            namespaces.insert(Some(uri.to_string()));
                        }
                    }
                }
                Ok(Self::Set(namespaces))
            }
        }
    }

    /// Check if a namespace is allowed by this constraint
    pub fn is_allowed(&self, namespace: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Not(excluded) => namespace.is_some() && namespace != excluded.as_deref(),
            Self::Set(set) => set.contains(&namespace.map(String::from)),
        }
    }

    /// Union of two constraints (XSD 1.0 §3.10.6, attribute wildcard union)
    ///
    /// Returns `None` when the union is not expressible.
    pub fn union(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (a, b) if a == b => Some(a.clone()),
            (Self::Any, _) | (_, Self::Any) => Some(Self::Any),
            (Self::Set(a), Self::Set(b)) => Some(Self::Set(a.union(b).cloned().collect())),
            (Self::Not(_), Self::Not(_)) => Some(Self::Not(None)),
            (Self::Not(negated), Self::Set(set)) | (Self::Set(set), Self::Not(negated)) => {
                match negated {
                    None => {
                        if set.contains(&None) {
                            Some(Self::Any)
                        } else {
                            Some(Self::Not(None))
                        }
                    }
                    Some(_) => {
                        let has_negated = set.contains(negated);
                        let has_absent = set.contains(&None);
                        match (has_negated, has_absent) {
                            (true, true) => Some(Self::Any),
                            (true, false) => Some(Self::Not(None)),
                            (false, true) => None,
                            (false, false) => Some(Self::Not(negated.clone())),
                        }
                    }
                }
            }
        }
    }

    /// Intersection of two constraints (XSD 1.0 §3.10.6)
    ///
    /// Returns `None` when the intersection is not expressible.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (a, b) if a == b => Some(a.clone()),
            (Self::Any, o) | (o, Self::Any) => Some(o.clone()),
            (Self::Set(a), Self::Set(b)) => Some(Self::Set(a.intersection(b).cloned().collect())),
            (Self::Not(negated), Self::Set(set)) | (Self::Set(set), Self::Not(negated)) => Some(
                Self::Set(
                    set.iter()
                        .filter(|ns| ns.is_some() && *ns != negated)
                        .cloned()
                        .collect(),
                ),
            ),
            (Self::Not(None), o @ Self::Not(_)) | (o @ Self::Not(_), Self::Not(None)) => {
                Some(o.clone())
            }
            (Self::Not(_), Self::Not(_)) => None,
        }
    }
}

impl fmt::Display for NamespaceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("##any"),
            Self::Not(Some(ns)) => write!(f, "not({})", ns),
            Self::Not(None) => f.write_str("not(##local)"),
            Self::Set(set) => {
                let names: Vec<&str> = set
                    .iter()
                    .map(|ns| ns.as_deref().unwrap_or("##local"))
                    .collect();
                f.write_str(&names.join(" "))
            }
        }
    }
}

/// Wildcard component (`any` or `anyAttribute`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wildcard {
    /// Namespace constraint
    pub namespace_constraint: NamespaceConstraint,
    /// Process contents mode
    pub process_contents: ProcessContents,
}

impl Wildcard {
    /// Create a wildcard
    pub fn new(namespace_constraint: NamespaceConstraint, process_contents: ProcessContents) -> Self {
        Self {
            namespace_constraint,
            process_contents,
        }
    }

    /// The `##any`, lax wildcard of the ur-type
    pub fn any_lax() -> Self {
        Self::new(NamespaceConstraint::Any, ProcessContents::Lax)
    }

    /// Build from an `any` or `anyAttribute` element
    pub fn from_element(node: &Element, target_namespace: Option<&str>) -> Result<Self> {
        let namespace_constraint = match node.get_attribute("namespace") {
            Some(value) => NamespaceConstraint::from_namespace_attr(value, target_namespace)
                .map_err(|_| {
                    node.structure_error(format!("wrong value '{}' in 'namespace' attribute", value))
                })?,
            None => NamespaceConstraint::Any,
        };
        let process_contents = match node.get_attribute("processContents") {
            Some(value) => ProcessContents::from_str(value.trim()).ok_or_else(|| {
                node.structure_error(format!(
                    "wrong value '{}' in 'processContents' attribute",
                    value
                ))
            })?,
            None => ProcessContents::Strict,
        };
        Ok(Self::new(namespace_constraint, process_contents))
    }

    /// Intersect with `other`, keeping this wildcard's process contents
    pub fn intersect(&self, other: &Wildcard, location: &Element) -> Result<Self> {
        let constraint = self
            .namespace_constraint
            .intersection(&other.namespace_constraint)
            .ok_or_else(|| location.structure_error("attribute wildcard intersection is not expressible"))?;
        Ok(Self::new(constraint, self.process_contents))
    }

    /// Unite with `other`, keeping this wildcard's process contents
    pub fn unite(&self, other: &Wildcard, location: &Element) -> Result<Self> {
        let constraint = self
            .namespace_constraint
            .union(&other.namespace_constraint)
            .ok_or_else(|| location.structure_error("attribute wildcard union is not expressible"))?;
        Ok(Self::new(constraint, self.process_contents))
    }

    /// Check if a namespace is allowed
    pub fn is_namespace_allowed(&self, namespace: Option<&str>) -> bool {
        self.namespace_constraint.is_allowed(namespace)
    }
}
