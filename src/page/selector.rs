use crate::page::element::Element;

// ============================================================================
// SELECTORS
// ============================================================================

/// A parsed lookup selector: `#id`, `.class`, or a bare tag name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
    Tag(String),
}

impl Selector {
    pub fn parse(input: &str) -> Self {
        if let Some(id) = input.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(class) = input.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else {
            Selector::Tag(input.to_string())
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => element.has_class(class),
            Selector::Tag(tag) => element.tag == *tag,
        }
    }
}
