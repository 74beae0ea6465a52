//! Minimal element tree standing in for the host UI.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Ids are never
//! reused, so a handle to a removed node stays harmlessly stale: every lookup
//! on it yields `None` and every mutation is ignored.

mod selector;

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::Serialize;

pub use selector::Selector;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    html: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
    width: Option<f64>,
}

impl Node {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Inner markup, exactly as inserted.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Width as a percentage, when one has been applied.
    #[must_use]
    pub const fn width(&self) -> Option<f64> {
        self.width
    }
}

/// Element arena.
///
/// Removed nodes leave an empty slot behind and slots are never reused, so a
/// stale [`NodeId`] can only ever resolve to nothing. The arena therefore
/// grows by one slot per element ever created, toasts included.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `<html><body></body></html>` tree.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            focused: None,
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        }));
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Whether the node exists and hangs off the document root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.get(current).and_then(Node::parent);
        }
        false
    }

    /// Strict ancestry: a node is not its own ancestor.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.get(node).and_then(Node::parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Node::parent);
        }
        false
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, child, false);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, child, true);
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, front: bool) {
        if parent == child
            || self.get(parent).is_none()
            || self.get(child).is_none()
            || self.is_ancestor(child, parent)
        {
            return;
        }
        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            if front {
                node.children.insert(0, child);
            } else {
                node.children.push(child);
            }
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.get(child).and_then(Node::parent) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// Detach `id` and drop it together with its whole subtree.
    ///
    /// Focus held anywhere inside the subtree is released.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || self.get(id).is_none() {
            return false;
        }
        if self
            .focused
            .is_some_and(|f| f == id || self.is_ancestor(id, f))
        {
            self.focused = None;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        true
    }

    pub fn set_id(&mut self, id: NodeId, value: &str) {
        if let Some(node) = self.get_mut(id) {
            node.id = Some(value.to_string());
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.get_mut(id) {
            for part in class.split_whitespace() {
                if !node.has_class(part) {
                    node.classes.push(part.to_string());
                }
            }
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.get_mut(id) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_html(&mut self, id: NodeId, html: &str) {
        if let Some(node) = self.get_mut(id) {
            node.html = html.to_string();
        }
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(node) = self.get_mut(id) {
            node.hidden = hidden;
        }
    }

    pub fn set_width(&mut self, id: NodeId, percent: f64) {
        if let Some(node) = self.get_mut(id) {
            node.width = Some(percent);
        }
    }

    /// Every attached node, in document (pre-)order.
    #[must_use]
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev());
        }
        order
    }

    /// Attached nodes matching `selector`, in document order.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|node| selector.matches(node)))
            .collect()
    }

    #[must_use]
    pub fn child_with_class(&self, parent: NodeId, class: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.get(*child).is_some_and(|n| n.has_class(class)))
    }

    /// Move input focus to an attached node.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Whether some descendant of `id` (not `id` itself) holds focus.
    #[must_use]
    pub fn has_focus_within(&self, id: NodeId) -> bool {
        self.focused.is_some_and(|f| self.is_ancestor(id, f))
    }

    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        if let Some(value) = &node.id {
            let _ = write!(out, " id=\"{value}\"");
        }
        if !node.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", node.classes.join(" "));
        }
        for (name, value) in &node.attributes {
            let _ = write!(out, " {name}=\"{value}\"");
        }
        let mut style = Vec::new();
        if node.hidden {
            style.push("display: none".to_string());
        }
        if let Some(width) = node.width {
            style.push(format!("width: {width}%"));
        }
        if !style.is_empty() {
            let _ = write!(out, " style=\"{}\"", style.join("; "));
        }
        out.push('>');
        out.push_str(&node.html);
        for child in &node.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

/// Escape `&`, `"`, `'`, `<` and `>`, in that order.
#[must_use]
pub fn escape_html(source: &str) -> String {
    source
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
