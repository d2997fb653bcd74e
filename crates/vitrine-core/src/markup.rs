//! Read-only view of widget markup.
//!
//! Widgets read their anchors, options and `data-*` configuration through
//! the [`Markup`] trait exactly once, at construction. The browser binding
//! implements it for live DOM elements; [`Element`] is an in-memory tree
//! used for server-side rendering fixtures and tests.

use std::collections::BTreeMap;

/// Query surface a widget needs from its root element.
///
/// All `find_*` methods search descendants only (like `querySelector` on
/// the element), in document order.
pub trait Markup: Sized {
    /// Lower-case tag name.
    fn tag(&self) -> String;

    /// Attribute value, `None` when absent.
    fn attr(&self, name: &str) -> Option<String>;

    /// Whether the element carries a class.
    fn has_class(&self, class: &str) -> bool;

    /// Concatenated text content of the element and its descendants.
    fn text(&self) -> String;

    /// All descendants matching a predicate-equivalent query.
    fn find_all(&self, query: &Query<'_>) -> Vec<Self>;

    /// Whether both handles point at the same node.
    fn is_same(&self, other: &Self) -> bool;

    /// Whether the attribute is present.
    fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// First descendant matching the query.
    fn find(&self, query: &Query<'_>) -> Option<Self> {
        self.find_all(query).into_iter().next()
    }

    /// First descendant with `data-ref="{name}"`.
    fn find_ref(&self, name: &str) -> Option<Self> {
        self.find(&Query::AttrEq("data-ref", name))
    }
}

/// Descendant query, the subset of CSS selectors widgets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// `tag`
    Tag(&'a str),
    /// `.class`
    Class(&'a str),
    /// `[name]`
    Attr(&'a str),
    /// `[name="value"]`
    AttrEq(&'a str, &'a str),
    /// `tag[name="value"]`
    TagAttrEq(&'a str, &'a str, &'a str),
}

impl Query<'_> {
    /// CSS selector text for this query.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Tag(tag) => (*tag).to_string(),
            Self::Class(class) => format!(".{class}"),
            Self::Attr(name) => format!("[{name}]"),
            Self::AttrEq(name, value) => format!("[{name}=\"{value}\"]"),
            Self::TagAttrEq(tag, name, value) => format!("{tag}[{name}=\"{value}\"]"),
        }
    }

    /// Test an element against the query.
    pub fn matches<M: Markup>(&self, el: &M) -> bool {
        match self {
            Self::Tag(tag) => el.tag().eq_ignore_ascii_case(tag),
            Self::Class(class) => el.has_class(class),
            Self::Attr(name) => el.has_attr(name),
            Self::AttrEq(name, value) => el.attr(name).as_deref() == Some(*value),
            Self::TagAttrEq(tag, name, value) => {
                el.tag().eq_ignore_ascii_case(tag) && el.attr(name).as_deref() == Some(*value)
            }
        }
    }
}

/// In-memory element tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with a tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set `data-ref`.
    #[must_use]
    pub fn data_ref(self, name: &str) -> Self {
        self.attr("data-ref", name)
    }

    /// Append a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        let entry = self.attrs.entry("class".to_string()).or_default();
        if !entry.split_whitespace().any(|c| c == class) {
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(class);
        }
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Child elements.
    #[must_use]
    pub fn child_elements(&self) -> &[Self] {
        &self.children
    }

    fn collect<'a>(&'a self, query: &Query<'_>, out: &mut Vec<&'a Self>) {
        for child in &self.children {
            if query.matches(&child) {
                out.push(child);
            }
            child.collect(query, out);
        }
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

impl<'a> Markup for &'a Element {
    fn tag(&self) -> String {
        self.tag.clone()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.get(name).cloned()
    }

    fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn find_all(&self, query: &Query<'_>) -> Vec<Self> {
        let mut out = Vec::new();
        self.collect(query, &mut out);
        out
    }

    fn is_same(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("DIV")
            .attr("data-component", "select")
            .child(Element::new("button").data_ref("toggle").text("Open"))
            .child(
                Element::new("ul")
                    .data_ref("list")
                    .child(Element::new("li").class("opt").class("is-selected").text(" A "))
                    .child(Element::new("li").class("opt").text("B")),
            )
    }

    #[test]
    fn test_tag_is_lowercased() {
        let el = sample();
        assert_eq!((&el).tag(), "div");
    }

    #[test]
    fn test_find_ref() {
        let el = sample();
        let root = &el;
        let toggle = root.find_ref("toggle").unwrap();
        assert_eq!(toggle.text(), "Open");
        assert!(root.find_ref("dropdown").is_none());
    }

    #[test]
    fn test_find_all_by_class_in_document_order() {
        let el = sample();
        let opts = (&el).find_all(&Query::Class("opt"));
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].text(), " A ");
        assert!(opts[0].has_class("is-selected"));
        assert!(!opts[1].has_class("is-selected"));
    }

    #[test]
    fn test_find_excludes_self() {
        let el = Element::new("div").attr("data-ref", "toggle");
        assert!((&el).find_ref("toggle").is_none());
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let el = sample();
        assert_eq!((&el).text(), "Open A B");
    }

    #[test]
    fn test_class_dedup() {
        let el = Element::new("i").class("a").class("a").class("b");
        assert_eq!((&el).attr("class").as_deref(), Some("a b"));
    }

    #[test]
    fn test_query_css() {
        assert_eq!(Query::Tag("img").to_css(), "img");
        assert_eq!(Query::Class("x").to_css(), ".x");
        assert_eq!(Query::Attr("data-x").to_css(), "[data-x]");
        assert_eq!(Query::AttrEq("data-ref", "list").to_css(), "[data-ref=\"list\"]");
        assert_eq!(
            Query::TagAttrEq("input", "name", "phone").to_css(),
            "input[name=\"phone\"]"
        );
    }

    #[test]
    fn test_tag_attr_query() {
        let el = Element::new("form")
            .child(Element::new("input").attr("name", "phone"))
            .child(Element::new("div").attr("name", "phone"));
        let found = (&el).find_all(&Query::TagAttrEq("input", "name", "phone"));
        assert_eq!(found.len(), 1);
        assert_eq!((&el).find_all(&Query::Tag("DIV")).len(), 1);
    }

    #[test]
    fn test_is_same_compares_nodes() {
        let el = Element::new("ul")
            .child(Element::new("li").text("a"))
            .child(Element::new("li").text("a"));
        let items = (&el).find_all(&Query::Tag("li"));
        assert!(items[0].is_same(&items[0]));
        assert!(!items[0].is_same(&items[1]));
        assert_eq!(items[0], items[1]);
    }
}
