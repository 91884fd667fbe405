// ABOUTME: In-memory element tree owned by a carousel instance
// ABOUTME: Provides element creation, class toggling, inline styles and HTML serialization

use std::collections::BTreeMap;
use std::fmt;

/// Handle to an element stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A child of an element: either another element or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<Child>,
    offset_width: Option<f64>,
}

/// Arena of elements. Layout metrics such as `offset_width` are supplied by the
/// host; the document never computes them.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

/// Elements that never have children or a closing tag in HTML output.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element with the given tag name.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.elements.push(Element {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            offset_width: None,
        });
        NodeId(self.elements.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.elements[node.0].tag
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[Child] {
        &self.elements[node.0].children
    }

    /// Element children of `node`, skipping text runs.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.elements[node.0]
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Element(id) => Some(*id),
                Child::Text(_) => None,
            })
            .collect()
    }

    /// Direct element children of `node` with the given tag, in document order.
    pub fn children_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.element_children(node)
            .into_iter()
            .filter(|id| self.elements[id.0].tag.eq_ignore_ascii_case(tag))
            .collect()
    }

    /// First descendant of `node` (depth-first, document order) with the given tag.
    pub fn query_selector_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        for child in self.element_children(node) {
            if self.elements[child.0].tag.eq_ignore_ascii_case(tag) {
                return Some(child);
            }
            if let Some(found) = self.query_selector_tag(child, tag) {
                return Some(found);
            }
        }
        None
    }

    /// Walk from `node`'s parent up to the root.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(node),
        }
    }

    /// Returns true when `ancestor` is `node` itself or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|id| id == ancestor)
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.elements[node.0].parent.take() {
            self.elements[parent.0]
                .children
                .retain(|child| *child != Child::Element(node));
        }
    }

    /// Append `child` to `parent`, moving it out of its current parent if any.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(Child::Element(child));
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        self.elements[parent.0]
            .children
            .push(Child::Text(text.to_string()));
    }

    /// Replace every child of `parent` with `children`, in order.
    pub fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for old in self.element_children(parent) {
            self.elements[old.0].parent = None;
        }
        self.elements[parent.0].children.clear();
        for child in children {
            self.append_child(parent, *child);
        }
    }

    /// Overwrite the whole class list, like assigning `className`.
    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        self.elements[node.0].classes = class_name
            .split_whitespace()
            .map(str::to_string)
            .collect();
    }

    pub fn class_name(&self, node: NodeId) -> String {
        self.elements[node.0].classes.join(" ")
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.elements[node.0].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.elements[node.0].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.elements[node.0].classes.retain(|c| c != class);
    }

    /// Add or remove `class` according to `force`.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, force: bool) {
        if force {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("class") {
            self.set_class_name(node, value);
            return;
        }
        if name.eq_ignore_ascii_case("style") {
            self.set_style_text(node, value);
            return;
        }
        self.elements[node.0]
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.elements[node.0]
            .attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.elements[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.elements[node.0].style.get(property).map(String::as_str)
    }

    fn set_style_text(&mut self, node: NodeId, text: &str) {
        for declaration in text.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                let property = property.trim();
                if !property.is_empty() {
                    self.set_style(node, property, value.trim());
                }
            }
        }
    }

    /// Rendered width reported by the host's layout, if any.
    pub fn offset_width(&self, node: NodeId) -> Option<f64> {
        self.elements[node.0].offset_width
    }

    pub fn set_offset_width(&mut self, node: NodeId, width: f64) {
        self.elements[node.0].offset_width = Some(width);
    }

    /// Concatenated text content of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.elements[node.0].children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(id) => out.push_str(&self.text_content(*id)),
            }
        }
        out
    }

    /// Serialize `node` and its subtree as HTML.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    /// Serialize only the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.elements[node.0].children {
            match child {
                Child::Element(id) => self.write_html(*id, &mut out),
                Child::Text(text) => out.push_str(&escape_text(text)),
            }
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let element = &self.elements[node.0];
        out.push('<');
        out.push_str(&element.tag);
        if !element.classes.is_empty() {
            out.push_str(&format!(
                " class=\"{}\"",
                escape_attribute(&element.classes.join(" "))
            ));
        }
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }
        if !element.style.is_empty() {
            let style = element
                .style
                .iter()
                .map(|(property, value)| format!("{}: {};", property, value))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!(" style=\"{}\"", escape_attribute(&style)));
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            return;
        }

        out.push_str(&self.inner_html(node));
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

/// Iterator over the ancestors of an element, nearest first.
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}

/// Escape text for use as HTML element content
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_child_reparents() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");

        doc.append_child(a, child);
        doc.append_child(b, child);

        assert!(doc.element_children(a).is_empty());
        assert_eq!(doc.element_children(b), vec![child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_toggle_class_is_idempotent() {
        let mut doc = Document::new();
        let node = doc.create_element("li");

        doc.toggle_class(node, "active", true);
        doc.toggle_class(node, "active", true);
        assert_eq!(doc.class_name(node), "active");

        doc.toggle_class(node, "active", false);
        assert!(!doc.has_class(node, "active"));
    }

    #[test]
    fn test_query_selector_tag_is_depth_first() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let first = doc.create_element("div");
        let nested = doc.create_element("ul");
        let later = doc.create_element("ul");
        doc.append_child(root, first);
        doc.append_child(first, nested);
        doc.append_child(root, later);

        assert_eq!(doc.query_selector_tag(root, "ul"), Some(nested));
    }

    #[test]
    fn test_to_html_escapes_and_orders() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.set_class_name(button, "carousel-nav carousel-nav-prev");
        doc.set_attribute(button, "aria-label", "Say \"hi\"");
        doc.append_text(button, "<");

        assert_eq!(
            doc.to_html(button),
            r#"<button class="carousel-nav carousel-nav-prev" aria-label="Say &quot;hi&quot;">&lt;</button>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let mut doc = Document::new();
        let img = doc.create_element("img");
        doc.set_attribute(img, "src", "a.png");
        assert_eq!(doc.to_html(img), r#"<img src="a.png">"#);
    }

    #[test]
    fn test_style_attribute_is_parsed() {
        let mut doc = Document::new();
        let node = doc.create_element("ul");
        doc.set_attribute(node, "style", "color: red; transform: none");
        assert_eq!(doc.style(node, "color"), Some("red"));
        assert_eq!(doc.style(node, "transform"), Some("none"));
    }
}
