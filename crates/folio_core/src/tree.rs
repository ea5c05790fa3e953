//! Display tree
//!
//! A minimal document model: typed element handles with classes, attributes,
//! inline styles, text and layout bounds. Everything the behavior layer does
//! ends up as a mutation here.
//!
//! Handles are slotmap keys, so a handle to a removed element is detected
//! (not reused) and every mutation on it is a silent no-op.
//!
//! # Example
//!
//! ```rust
//! use folio_core::tree::{DisplayTree, Element};
//! use folio_core::Rect;
//!
//! let mut tree = DisplayTree::new();
//! let body = tree.body();
//! let card = tree.append(
//!     body,
//!     Element::new("div")
//!         .with_class("project-card")
//!         .with_bounds(Rect::new(0.0, 900.0, 400.0, 300.0)),
//! );
//!
//! assert_eq!(tree.select(".project-card"), vec![card]);
//! tree.add_class(card, "visible");
//! assert!(tree.has_class(card, "visible"));
//! ```

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::geometry::Rect;

new_key_type! {
    /// Handle to an element in the display tree
    pub struct ElementId;
}

/// A single node of the display tree
#[derive(Clone, Debug, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: SmallVec<[String; 4]>,
    pub attributes: FxHashMap<String, String>,
    /// Inline styles in insertion order
    pub style: IndexMap<String, String>,
    pub text: String,
    /// Current value for form controls
    pub value: String,
    pub disabled: bool,
    /// Layout box in document coordinates
    pub bounds: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// One compound selector: `tag`, `#id`, `.class`, `tag.class`, `a[href^="#"]`
#[derive(Clone, Debug, Default, PartialEq)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attr_prefix: Option<(String, String)>,
}

impl SimpleSelector {
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut sel = SimpleSelector::default();
        let (head, attr) = match input.find('[') {
            Some(start) => {
                let end = input.rfind(']').filter(|end| *end > start)?;
                (&input[..start], Some(&input[start + 1..end]))
            }
            None => (input, None),
        };

        if let Some(attr) = attr {
            let (name, value) = attr.split_once("^=")?;
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            sel.attr_prefix = Some((name.trim().to_string(), value.to_string()));
        }

        // Split on '.' and '#' while remembering which sigil introduced each part
        let mut sigil = ' ';
        let mut current = String::new();
        for ch in head.chars().chain(std::iter::once('.')) {
            if ch == '.' || ch == '#' {
                if !current.is_empty() {
                    match sigil {
                        '.' => sel.classes.push(std::mem::take(&mut current)),
                        '#' => sel.id = Some(std::mem::take(&mut current)),
                        _ => sel.tag = Some(std::mem::take(&mut current)),
                    }
                }
                sigil = ch;
            } else {
                current.push(ch);
            }
        }

        Some(sel)
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        if let Some((name, prefix)) = &self.attr_prefix {
            match element.attr(name) {
                Some(value) if value.starts_with(prefix.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// A comma-separated selector list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    parts: Vec<SimpleSelector>,
}

impl Selector {
    /// Parse a selector list; unparseable parts are dropped
    pub fn parse(input: &str) -> Self {
        let parts = input
            .split(',')
            .filter_map(|part| {
                let parsed = SimpleSelector::parse(part);
                if parsed.is_none() && !part.trim().is_empty() {
                    tracing::debug!("ignoring unsupported selector part {:?}", part);
                }
                parsed
            })
            .collect();
        Self { parts }
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.parts.iter().any(|p| p.matches(element))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// The document: an `html` root with a `body` child
pub struct DisplayTree {
    nodes: SlotMap<ElementId, Element>,
    root: ElementId,
    body: ElementId,
}

impl DisplayTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element::new("html"));
        let mut body = Element::new("body");
        body.parent = Some(root);
        let body = nodes.insert(body);
        nodes[root].children.push(body);
        Self { nodes, root, body }
    }

    /// The `html` element
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The `body` element
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Number of live elements (including `html` and `body`)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append an element as the last child of `parent`
    ///
    /// A dead parent falls back to `body` so the element is never orphaned.
    pub fn append(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            tracing::debug!("append: parent gone, attaching to body");
            self.body
        };
        element.parent = Some(parent);
        element.children.clear();
        let id = self.nodes.insert(element);
        self.nodes[parent].children.push(id);
        id
    }

    /// Remove an element and its subtree
    ///
    /// Returns false for the root, the body, or a handle that is already gone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || id == self.body || !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent) = self.nodes[id].parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.nodes.remove(next) {
                stack.extend(el.children);
            }
        }
        true
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|e| e.parent)
    }

    /// Element with the given `id` attribute
    pub fn by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|e| self.nodes[*e].id.as_deref() == Some(id))
    }

    /// All descendants of `scope` in document order (excluding `scope`)
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let Some(start) = self.nodes.get(scope) else {
            return out;
        };
        let mut stack: Vec<ElementId> = start.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.nodes.get(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// All elements matching `selector` in document order
    pub fn select(&self, selector: &str) -> Vec<ElementId> {
        self.select_within(self.root, selector)
    }

    /// First element matching `selector`
    pub fn select_first(&self, selector: &str) -> Option<ElementId> {
        self.select(selector).into_iter().next()
    }

    /// Descendants of `scope` matching `selector`
    pub fn select_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let selector = Selector::parse(selector);
        if selector.is_empty() {
            return Vec::new();
        }
        self.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(&self.nodes[*id]))
            .collect()
    }

    /// First descendant of `scope` matching `selector`
    pub fn select_first_within(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        self.select_within(scope, selector).into_iter().next()
    }

    /// Whether `id` is `ancestor` or lies inside it
    pub fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // =========================================================================
    // Mutation helpers (no-ops on dead handles)
    // =========================================================================

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.nodes.get_mut(id) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.nodes.get_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            let live = self.contains(id);
            self.add_class(id, class);
            live
        }
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|e| e.style.get(property))
            .map(String::as_str)
    }

    /// Set an inline style; an empty value removes the property
    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(id) {
            let value = value.into();
            if value.is_empty() {
                el.style.shift_remove(property);
            } else {
                el.style.insert(property.to_string(), value);
            }
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|e| e.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(id) {
            el.text = text.into();
        }
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|e| e.attr(name))
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(id) {
            el.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(id).map(|e| e.bounds)
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(el) = self.nodes.get_mut(id) {
            el.disabled = disabled;
        }
    }
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DisplayTree, ElementId, ElementId, ElementId) {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let nav = tree.append(body, Element::new("nav").with_class("nav-menu"));
        let link = tree.append(
            nav,
            Element::new("a")
                .with_class("nav-link")
                .with_attr("href", "#about"),
        );
        let about = tree.append(
            body,
            Element::new("section")
                .with_id("about")
                .with_class("section")
                .with_class("about-section"),
        );
        (tree, nav, link, about)
    }

    #[test]
    fn test_select_by_class_id_and_tag() {
        let (tree, nav, link, about) = sample();

        assert_eq!(tree.select(".nav-menu"), vec![nav]);
        assert_eq!(tree.select("#about"), vec![about]);
        assert_eq!(tree.select("section.about-section"), vec![about]);
        assert_eq!(tree.select("a"), vec![link]);
        assert_eq!(tree.by_id("about"), Some(about));
        assert!(tree.select(".missing").is_empty());
    }

    #[test]
    fn test_select_list_keeps_document_order() {
        let (tree, nav, _link, about) = sample();
        assert_eq!(tree.select("#about, .nav-menu"), vec![nav, about]);
    }

    #[test]
    fn test_attribute_prefix_selector() {
        let (mut tree, _nav, link, _about) = sample();
        let body = tree.body();
        tree.append(body, Element::new("a").with_attr("href", "https://x.dev"));

        assert_eq!(tree.select("a[href^=\"#\"]"), vec![link]);
    }

    #[test]
    fn test_misplaced_brackets_match_nothing() {
        let (tree, _nav, _link, _about) = sample();

        assert!(tree.select("a]x[").is_empty());
        assert!(tree.select("a[]").is_empty());
        assert_eq!(tree.select_first("]["), None);
    }

    #[test]
    fn test_remove_subtree_invalidates_handles() {
        let (mut tree, nav, link, _about) = sample();
        let before = tree.len();

        assert!(tree.remove(nav));
        assert!(!tree.contains(nav));
        assert!(!tree.contains(link));
        assert_eq!(tree.len(), before - 2);

        // Mutations on dead handles are silent
        tree.add_class(link, "active");
        tree.set_style(link, "opacity", "1");
        assert!(!tree.remove(link));
        assert!(!tree.remove(tree.body()));
    }

    #[test]
    fn test_class_and_style_helpers() {
        let (mut tree, nav, _link, _about) = sample();

        assert!(tree.toggle_class(nav, "active"));
        assert!(tree.has_class(nav, "active"));
        assert!(!tree.toggle_class(nav, "active"));

        tree.set_style(nav, "opacity", "0");
        assert_eq!(tree.style(nav, "opacity"), Some("0"));
        tree.set_style(nav, "opacity", "");
        assert_eq!(tree.style(nav, "opacity"), None);
    }

    #[test]
    fn test_is_within() {
        let (tree, nav, link, about) = sample();
        assert!(tree.is_within(link, nav));
        assert!(tree.is_within(link, tree.root()));
        assert!(!tree.is_within(about, nav));
    }
}
