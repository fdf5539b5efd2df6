use std::time::Instant;

use crate::page::selector::Selector;

// ============================================================================
// PAGE ELEMENT TREE
// ============================================================================

/// A view element addressed by selector queries.
///
/// The terminal renderer reads these back with [`Page::query`] and
/// [`Page::query_all`] instead of holding widget references directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub text: String,
    pub(super) classes: Vec<String>,
    pub(super) children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            text: String::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(tag: &str, id: &str) -> Self {
        let mut element = Self::new(tag);
        element.id = Some(id.to_string());
        element
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Replace the class list wholesale.
    pub fn set_class_list(&mut self, classes: &[&str]) {
        self.classes = classes.iter().map(|c| c.to_string()).collect();
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    fn find(&self, selector: &Selector) -> Option<&Element> {
        if selector.matches(self) {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find(selector) {
                return Some(found);
            }
        }
        None
    }

    fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        if selector.matches(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Some(found) = child.find_mut(selector) {
                return Some(found);
            }
        }
        None
    }

    fn collect_matches<'a>(&'a self, selector: &Selector, out: &mut Vec<&'a Element>) {
        if selector.matches(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect_matches(selector, out);
        }
    }
}

// ============================================================================
// PAGE
// ============================================================================

/// Root of the element tree, plus the single pending toast-hide deadline.
#[derive(Clone, Debug)]
pub struct Page {
    pub(super) root: Element,
    pub(super) toast_hide_at: Option<Instant>,
}

impl Page {
    pub fn new() -> Self {
        Self {
            root: Element::new("body"),
            toast_hide_at: None,
        }
    }

    /// First element matching the selector, in document order.
    pub fn query(&self, selector: &str) -> Option<&Element> {
        self.root.find(&Selector::parse(selector))
    }

    /// All elements matching the selector, in document order.
    pub fn query_all(&self, selector: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.collect_matches(&Selector::parse(selector), &mut out);
        out
    }

    pub fn query_mut(&mut self, selector: &str) -> Option<&mut Element> {
        self.root.find_mut(&Selector::parse(selector))
    }

    /// Attach an element directly under the page root.
    pub fn attach(&mut self, element: Element) {
        self.root.children.push(element);
    }

    /// Set the text of the element with `id`, creating a classed div under
    /// the root when it does not exist yet.
    pub fn upsert(&mut self, id: &str, class: &str, text: &str) {
        if let Some(element) = self.query_mut(&format!("#{}", id)) {
            element.set_text(text);
            return;
        }
        let mut element = Element::with_id("div", id);
        element.add_class(class);
        element.set_text(text);
        self.attach(element);
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        let mut page = Page::new();
        let mut first = Element::with_id("div", "header");
        first.add_class("panel");
        first.set_text("one");
        let mut nested = Element::new("span");
        nested.add_class("panel");
        nested.set_text("two");
        first.append(nested);
        page.attach(first);
        let mut second = Element::new("span");
        second.add_class("footer");
        second.set_text("three");
        page.attach(second);
        page
    }

    #[test]
    fn test_query_returns_first_match_in_document_order() {
        let page = sample_page();
        assert_eq!(page.query(".panel").map(|e| e.text.as_str()), Some("one"));
        assert_eq!(page.query("span").map(|e| e.text.as_str()), Some("two"));
        assert_eq!(page.query("#header").map(|e| e.text.as_str()), Some("one"));
    }

    #[test]
    fn test_query_misses_return_none_or_empty() {
        let page = sample_page();
        assert!(page.query("#missing").is_none());
        assert!(page.query_all(".missing").is_empty());
    }

    #[test]
    fn test_query_all_collects_in_document_order() {
        let page = sample_page();
        let texts: Vec<&str> = page
            .query_all(".panel")
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(page.query_all("span").len(), 2);
    }

    #[test]
    fn test_upsert_creates_once_then_updates() {
        let mut page = Page::new();
        page.upsert("uptime", "stat", "1m 30s");
        page.upsert("uptime", "stat", "2m 0s");
        let matches = page.query_all(".stat");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "2m 0s");
    }

    #[test]
    fn test_class_list_updates() {
        let mut element = Element::new("div");
        element.set_class_list(&["toast", "error", "show"]);
        assert!(element.has_class("error"));
        element.remove_class("show");
        assert!(!element.has_class("show"));
        assert!(element.has_class("toast"));
        element.add_class("toast");
        assert_eq!(element.classes().len(), 2);
    }
}
