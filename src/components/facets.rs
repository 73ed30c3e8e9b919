//! Constraining facets
//!
//! Facets are carried as an opaque, ordered attachment of the restriction
//! that declared them. Nothing here evaluates them; the only facet the
//! crate reads back is `whiteSpace`, which the codecs need.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::XSD_NAMESPACE;
use std::fmt;

/// XSD length facet name
pub const XSD_LENGTH: &str = "length";
/// XSD minLength facet name
pub const XSD_MIN_LENGTH: &str = "minLength";
/// XSD maxLength facet name
pub const XSD_MAX_LENGTH: &str = "maxLength";
/// XSD pattern facet name
pub const XSD_PATTERN: &str = "pattern";
/// XSD enumeration facet name
pub const XSD_ENUMERATION: &str = "enumeration";
/// XSD whiteSpace facet name
pub const XSD_WHITE_SPACE: &str = "whiteSpace";
/// XSD maxInclusive facet name
pub const XSD_MAX_INCLUSIVE: &str = "maxInclusive";
/// XSD maxExclusive facet name
pub const XSD_MAX_EXCLUSIVE: &str = "maxExclusive";
/// XSD minInclusive facet name
pub const XSD_MIN_INCLUSIVE: &str = "minInclusive";
/// XSD minExclusive facet name
pub const XSD_MIN_EXCLUSIVE: &str = "minExclusive";
/// XSD totalDigits facet name
pub const XSD_TOTAL_DIGITS: &str = "totalDigits";
/// XSD fractionDigits facet name
pub const XSD_FRACTION_DIGITS: &str = "fractionDigits";

/// All XSD 1.0 constraining facet names
pub const FACET_NAMES: &[&str] = &[
    XSD_LENGTH,
    XSD_MIN_LENGTH,
    XSD_MAX_LENGTH,
    XSD_PATTERN,
    XSD_ENUMERATION,
    XSD_WHITE_SPACE,
    XSD_MAX_INCLUSIVE,
    XSD_MAX_EXCLUSIVE,
    XSD_MIN_INCLUSIVE,
    XSD_MIN_EXCLUSIVE,
    XSD_TOTAL_DIGITS,
    XSD_FRACTION_DIGITS,
];

/// Check whether `name` is a constraining facet
pub fn is_facet_name(name: &str) -> bool {
    FACET_NAMES.contains(&name)
}

/// White space normalization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteSpace {
    /// Preserve all white space
    #[default]
    Preserve,
    /// Replace tabs and newlines with spaces
    Replace,
    /// Replace and collapse multiple spaces
    Collapse,
}

impl WhiteSpace {
    /// Parse from string value
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "preserve" => Ok(WhiteSpace::Preserve),
            "replace" => Ok(WhiteSpace::Replace),
            "collapse" => Ok(WhiteSpace::Collapse),
            _ => Err(Error::Value(format!(
                "Invalid whiteSpace value: '{}'. Must be 'preserve', 'replace', or 'collapse'",
                s
            ))),
        }
    }

    /// Normalize a string according to this white space mode
    pub fn normalize(&self, s: &str) -> String {
        match self {
            WhiteSpace::Preserve => s.to_string(),
            WhiteSpace::Replace => s.replace(['\t', '\n', '\r'], " "),
            WhiteSpace::Collapse => s.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}

/// One facet as written in the schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Facet name, e.g. `maxLength`
    pub name: String,
    /// Lexical value of the `value` attribute
    pub value: String,
    /// `fixed="true"`
    pub fixed: bool,
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Ordered facet attachment of a restriction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    entries: Vec<Facet>,
}

impl Facets {
    /// Create an empty facet set
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the facet children of a `restriction` element
    ///
    /// Children named in `skip` (other component kinds allowed inside the
    /// restriction) are ignored; any other non-facet child is a structural
    /// error.
    pub fn from_restriction(restriction: &Element, skip: &[&str]) -> Result<Self> {
        let mut facets = Facets::new();
        for child in &restriction.children {
            let local = child.local_name();
            if child.namespace() != Some(XSD_NAMESPACE) {
                return Err(restriction.structure_error(format!(
                    "Unexpected element {} in restriction",
                    child.qname
                )));
            }
            if local == "annotation" || skip.contains(&local) {
                continue;
            }
            if !is_facet_name(local) {
                return Err(restriction.structure_error(format!(
                    "Unknown facet {} in restriction",
                    local
                )));
            }
            let value = child.get_attribute("value").ok_or_else(|| {
                child.structure_error(format!("Facet {} requires a value attribute", local))
            })?;
            let fixed = match child.get_attribute("fixed") {
                Some(flag) => super::codecs::boolean_to_rust(flag.trim())?,
                None => false,
            };
            facets.push(Facet {
                name: local.to_string(),
                value: value.to_string(),
                fixed,
            });
        }
        Ok(facets)
    }

    /// Append a facet
    pub fn push(&mut self, facet: Facet) {
        self.entries.push(facet);
    }

    /// Iterate over the facets in document order
    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.entries.iter()
    }

    /// First facet named `name`
    pub fn get(&self, name: &str) -> Option<&Facet> {
        self.entries.iter().find(|f| f.name == name)
    }

    /// Values of every `enumeration` facet
    pub fn enumeration(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|f| f.name == XSD_ENUMERATION)
            .map(|f| f.value.as_str())
            .collect()
    }

    /// The `whiteSpace` facet, if declared
    pub fn white_space(&self) -> Result<Option<WhiteSpace>> {
        self.get(XSD_WHITE_SPACE)
            .map(|f| WhiteSpace::from_str(f.value.trim()))
            .transpose()
    }

    /// Number of facets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for no facets
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    fn restriction(body: &str) -> Element {
        let xml = format!(
            r#"<xs:restriction xmlns:xs="http://www.w3.org/2001/XMLSchema" base="xs:string">{}</xs:restriction>"#,
            body
        );
        Document::from_string(&xml).unwrap().root.unwrap()
    }

    #[test]
    fn test_white_space_normalize() {
        assert_eq!(WhiteSpace::Replace.normalize("a\tb\nc"), "a b c");
        assert_eq!(WhiteSpace::Collapse.normalize("  a \t b\n\nc "), "a b c");
        assert_eq!(WhiteSpace::Preserve.normalize(" a "), " a ");
    }

    #[test]
    fn test_facets_in_order() {
        let node = restriction(
            r#"<xs:annotation/><xs:enumeration value="A"/><xs:enumeration value="B"/><xs:whiteSpace value="collapse" fixed="true"/>"#,
        );
        let facets = Facets::from_restriction(&node, &[]).unwrap();
        assert_eq!(facets.len(), 3);
        assert_eq!(facets.enumeration(), vec!["A", "B"]);
        assert_eq!(facets.white_space().unwrap(), Some(WhiteSpace::Collapse));
        assert!(facets.get(XSD_WHITE_SPACE).unwrap().fixed);
    }

    #[test]
    fn test_unknown_facet_is_structural() {
        let node = restriction(r#"<xs:maxSize value="3"/>"#);
        assert!(Facets::from_restriction(&node, &[]).unwrap_err().is_structural());
    }

    #[test]
    fn test_missing_value_is_structural() {
        let node = restriction(r#"<xs:length/>"#);
        assert!(Facets::from_restriction(&node, &[]).unwrap_err().is_structural());
    }

    #[test]
    fn test_skipped_children() {
        let node = restriction(r#"<xs:attribute name="a"/><xs:length value="2"/>"#);
        let facets = Facets::from_restriction(&node, &["attribute"]).unwrap();
        assert_eq!(facets.len(), 1);
    }
}
