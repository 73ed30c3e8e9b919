//! Annotation components

use crate::documents::Element;
use crate::XSD_NAMESPACE;
use std::fmt;

/// An `annotation` element: application information and human documentation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Text of each `appinfo` child
    pub app_info: Vec<String>,
    /// Text of each `documentation` child
    pub documentation: Vec<String>,
}

impl Annotation {
    /// Build from an `annotation` element
    pub fn from_element(node: &Element) -> Self {
        let mut annotation = Annotation::default();
        for child in &node.children {
            if child.is(Some(XSD_NAMESPACE), "appinfo") {
                annotation.app_info.push(collect_text(child));
            } else if child.is(Some(XSD_NAMESPACE), "documentation") {
                annotation.documentation.push(collect_text(child));
            }
        }
        annotation
    }

    /// Annotation of a component element, from its `annotation` child
    pub fn of(node: &Element) -> Option<Self> {
        node.children
            .iter()
            .find(|c| c.is(Some(XSD_NAMESPACE), "annotation"))
            .map(Annotation::from_element)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.documentation.concat())
    }
}

/// Text of an element and all its descendants, in document order
fn collect_text(node: &Element) -> String {
    let mut text = node.text.clone().unwrap_or_default();
    for child in &node.children {
        text.push_str(&collect_text(child));
    }
    text
}
